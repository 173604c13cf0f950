use crate::encodings::{
    ConstraintModel, LinearConstraint, ModelVariable, ObjectiveDirection, VarHandle, VariableKind,
};
use anyhow::{Context, Result};
use std::io::Write;

/// A writer rendering a [`ConstraintModel`] in the CPLEX LP format, for
/// consumption by external linear optimizers.
#[derive(Default)]
pub struct LpWriter;

impl LpWriter {
    /// Writes the model.
    pub fn write(&self, writer: &mut dyn Write, model: &ConstraintModel) -> Result<()> {
        let context = "while writing an LP model";
        match model.objective() {
            Some((terms, ObjectiveDirection::Maximize)) => {
                writeln!(writer, "Maximize").context(context)?;
                writeln!(writer, " obj: {}", render_terms(model, terms)).context(context)?;
            }
            Some((terms, ObjectiveDirection::Minimize)) => {
                writeln!(writer, "Minimize").context(context)?;
                writeln!(writer, " obj: {}", render_terms(model, terms)).context(context)?;
            }
            None => {
                writeln!(writer, "Minimize").context(context)?;
                writeln!(writer, " obj: 0").context(context)?;
            }
        }
        writeln!(writer, "Subject To").context(context)?;
        for (index, constraint) in model.constraints().iter().enumerate() {
            writeln!(writer, " c{}: {}", 1 + index, render_constraint(model, constraint))
                .context(context)?;
        }
        let integer_variables = model
            .variables()
            .iter()
            .filter(|v| matches!(v.kind(), VariableKind::Integer { .. }))
            .collect::<Vec<&ModelVariable>>();
        if !integer_variables.is_empty() {
            writeln!(writer, "Bounds").context(context)?;
            for variable in &integer_variables {
                if let VariableKind::Integer { lb, ub } = variable.kind() {
                    writeln!(writer, " {} <= {} <= {}", lb, variable.name(), ub)
                        .context(context)?;
                }
            }
        }
        let binary_variables = model
            .variables()
            .iter()
            .filter(|v| v.kind() == VariableKind::Binary)
            .collect::<Vec<&ModelVariable>>();
        if !binary_variables.is_empty() {
            writeln!(writer, "Binary").context(context)?;
            for variable in binary_variables {
                writeln!(writer, " {}", variable.name()).context(context)?;
            }
        }
        if !integer_variables.is_empty() {
            writeln!(writer, "General").context(context)?;
            for variable in integer_variables {
                writeln!(writer, " {}", variable.name()).context(context)?;
            }
        }
        writeln!(writer, "End").context(context)?;
        writer.flush().context(context)
    }
}

fn render_constraint(model: &ConstraintModel, constraint: &LinearConstraint) -> String {
    format!(
        "{} {} {}",
        render_terms(model, constraint.terms()),
        constraint.relation(),
        constraint.bound()
    )
}

fn render_terms(model: &ConstraintModel, terms: &[(i64, VarHandle)]) -> String {
    let mut result = String::new();
    for (index, (coefficient, var)) in terms.iter().enumerate() {
        let name = model.variables()[var.index()].name();
        if index == 0 {
            match coefficient {
                1 => result.push_str(name),
                -1 => result.push_str(&format!("- {}", name)),
                _ => result.push_str(&format!("{} {}", coefficient, name)),
            }
        } else {
            let sign = if *coefficient < 0 { '-' } else { '+' };
            match coefficient.abs() {
                1 => result.push_str(&format!(" {} {}", sign, name)),
                n => result.push_str(&format!(" {} {} {}", sign, n, name)),
            }
        }
    }
    result
}
