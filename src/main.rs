use app::{CheckCommand, CliManager, Command, EncodeCommand, SolveCommand};

mod app;

fn main() {
    let app_name = option_env!("CARGO_PKG_NAME").unwrap_or("unknown app name");
    let app_version = option_env!("CARGO_PKG_VERSION").unwrap_or("unknown version");
    let mut manager = CliManager::new(
        app_name,
        app_version,
        "Matchop, a stable matching (MAX-SMTI) solver.",
    );
    let commands: Vec<Box<dyn Command>> = vec![
        Box::new(CheckCommand::new()),
        Box::new(EncodeCommand::new()),
        Box::new(SolveCommand::new()),
    ];
    for c in commands {
        manager.add_command(c);
    }
    manager.launch();
}
