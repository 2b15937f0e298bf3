use super::test_helpers::{
    MockEngine, Script, create_test_downloader, test_config, wait_for_terminal,
};
use super::*;
use crate::types::{Event, OutputKind, Status};


/// Drain every event currently buffered on `rx`
fn drain(rx: &mut tokio::sync::broadcast::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
