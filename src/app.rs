use anyhow::Result;

use crate::{
    chat::session::{ChatSession, SessionSettings},
    cli::{Cli, Command},
    domain,
    domain::message::CustomerIdentity,
    infra, ui,
    usecases::{self, bootstrap::bootstrap, shell::DefaultShellOrchestrator},
};

pub fn run(cli: Cli) -> Result<()> {
    tracing::debug!(
        ui = ui::module_name(),
        domain = domain::module_name(),
        chat = crate::chat::module_name(),
        usecases = usecases::module_name(),
        infra = infra::module_name(),
        "module boundaries loaded"
    );

    match cli.command_or_default() {
        Command::Run => {
            let context = bootstrap(cli.config.as_deref())?;
            let settings = SessionSettings::from_config(&context.config)?;
            let identity = CustomerIdentity {
                id: context.config.customer.id,
                name: context.config.customer.name.clone(),
            };

            let (session, session_events) = ChatSession::spawn(settings)?;
            let mut event_source = ui::CrosstermEventSource;
            let mut orchestrator = DefaultShellOrchestrator::new(
                &session,
                identity,
                context.config.chat.clone(),
            );

            let outcome = ui::shell::start(
                &context,
                &mut event_source,
                &session_events,
                &mut orchestrator,
            );

            // Close the socket and join the worker before surfacing any
            // shell error, so the terminal is already restored.
            session.dispose();
            outcome?;
        }
    }

    Ok(())
}
