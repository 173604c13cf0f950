//! Translation of instances into constraint models, for linear and propositional backends.

mod constraint_model;
pub use constraint_model::ConstraintModel;
pub use constraint_model::LinearConstraint;
pub use constraint_model::ModelVariable;
pub use constraint_model::VariableKind;

mod matching_vars;
pub use matching_vars::MatchingVars;

mod model_builder;
pub use model_builder::ConstraintModelBuilder;

mod objectives;
pub use objectives::encode_objective;

mod pairwise_stability_encoder;
pub use pairwise_stability_encoder::PairwiseStabilityEncoder;

mod propositional_sink;
pub use propositional_sink::PropositionalSink;

mod specs;
pub use specs::ModelLiteral;
pub use specs::ModelSink;
pub use specs::ObjectiveDirection;
pub use specs::Relation;
pub use specs::StabilityEncoder;
pub use specs::VarHandle;

mod tie_prefix_stability_encoder;
pub use tie_prefix_stability_encoder::TiePrefixCounters;
pub use tie_prefix_stability_encoder::TiePrefixStabilityEncoder;
