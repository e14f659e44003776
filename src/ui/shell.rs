use std::sync::mpsc::Receiver;

use anyhow::Result;

use crate::{
    domain::events::SessionEvent,
    usecases::{
        context::AppContext,
        contracts::{AppEventSource, ShellOrchestrator},
    },
};

use super::{terminal::TerminalSession, view};

/// Runs the TUI loop until the orchestrator stops.
///
/// Each iteration draws the current state, drains pending session events
/// from the chat worker, then handles at most one terminal event.
pub fn start(
    context: &AppContext,
    event_source: &mut dyn AppEventSource,
    session_events: &Receiver<SessionEvent>,
    orchestrator: &mut dyn ShellOrchestrator,
) -> Result<()> {
    tracing::info!(
        log_level = %context.config.logging.level,
        base_url = %context.config.server.base_url,
        "starting chat shell"
    );

    let mut terminal = TerminalSession::new()?;

    while orchestrator.state().is_running() {
        terminal.draw(|frame| view::render(frame, orchestrator.state()))?;

        while let Ok(event) = session_events.try_recv() {
            orchestrator.handle_session_event(event)?;
        }

        if let Some(event) = event_source.next_event()? {
            orchestrator.handle_event(event)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        chat::{frames::ClientFrame, upload::UploadJob},
        domain::{events::AppEvent, message::CustomerIdentity},
        infra::config::ChatConfig,
        ui::event_source::MockEventSource,
        usecases::{
            contracts::{ChatTransport, TransportError},
            shell::DefaultShellOrchestrator,
        },
    };

    struct NoopTransport;

    impl ChatTransport for NoopTransport {
        fn send_frame(&self, _frame: ClientFrame) -> Result<(), TransportError> {
            Ok(())
        }

        fn send_attachment(&self, _job: UploadJob) -> Result<(), TransportError> {
            Ok(())
        }
    }

    #[test]
    fn mock_source_produces_quit_event() {
        let mut source = MockEventSource::from(vec![AppEvent::QuitRequested]);
        let event = source.next_event().expect("must read mock event");

        assert_eq!(event, Some(AppEvent::QuitRequested));
    }

    #[test]
    fn orchestrator_stops_on_quit_from_source() {
        let mut source = MockEventSource::from(vec![AppEvent::QuitRequested]);
        let mut orchestrator = DefaultShellOrchestrator::new(
            NoopTransport,
            CustomerIdentity {
                id: 1,
                name: "Ada".to_owned(),
            },
            ChatConfig::default(),
        );

        if let Some(event) = source.next_event().expect("must read mock event") {
            orchestrator
                .handle_event(event)
                .expect("must handle quit event");
        }

        assert!(!orchestrator.state().is_running());
    }
}
