//! Processor Task - serialized event and request processing
//!
//! [`run`] is the single owner of the [`AvrcpController`]. It drains the
//! message queue of an [`AvrcpChannels`] one message at a time: inbound events
//! are applied, API requests are answered on the response channel. Nothing
//! else mutates the controller, so a command can never race the event that
//! just changed the play status.
//!
//! # Usage
//!
//! Spawn the processor as an Embassy task next to the transport glue that
//! posts events:
//!
//! ```rust,ignore
//! use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
//! use remotebird::{AvrcpChannels, AvrcpController, processor};
//!
//! static CHANNELS: AvrcpChannels<CriticalSectionRawMutex> = AvrcpChannels::new();
//!
//! #[embassy_executor::task]
//! async fn avrcp_task(mut controller: AvrcpController<Transport, Bip, Session, Volume, Routing>) {
//!     processor::run(&CHANNELS, &mut controller).await
//! }
//! ```
//!
//! # Generic Parameters
//!
//! * `M: RawMutex` - Mutex flavor of the channels
//! * `T, I, S, V, A` - The controller's collaborators
//! * `N` - Queue depth

use crate::traits::{AudioRouting, AvrcpTransport, ImageTransfer, MediaSession, SystemVolume};
use crate::{AvrcpChannels, AvrcpController, Message};
use embassy_sync::blocking_mutex::raw::RawMutex;

/// Process messages forever
pub async fn run<M, T, I, S, V, A, const N: usize>(
    channels: &AvrcpChannels<M, N>,
    controller: &mut AvrcpController<T, I, S, V, A>,
) -> !
where
    M: RawMutex,
    T: AvrcpTransport,
    I: ImageTransfer,
    S: MediaSession,
    V: SystemVolume,
    A: AudioRouting,
{
    loop {
        trace!("[PROCESSOR] Waiting for message...");
        match channels.messages.receive().await {
            Message::Event(event) => {
                let name = event.name();
                if let Err(e) = controller.handle_event(event) {
                    debug!("[PROCESSOR] Event {} dropped: {}", name, e);
                }
            }
            Message::Request(request) => {
                let response = controller.process_request(request);
                channels.responses.send(response).await;
            }
        }
    }
}
