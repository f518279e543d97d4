use super::AvrcpController;
use crate::traits::{AudioRouting, AvrcpTransport, ImageTransfer, MediaSession, SystemVolume};
use crate::{Request, Response};

impl<T, I, S, V, A> AvrcpController<T, I, S, V, A>
where
    T: AvrcpTransport,
    I: ImageTransfer,
    S: MediaSession,
    V: SystemVolume,
    A: AudioRouting,
{
    /// Answer one API request
    pub(crate) fn process_request(&mut self, request: Request) -> Response {
        match request {
            Request::SendPassThrough {
                device,
                op,
                key_state,
            } => match self.send_pass_through_command(device, op, key_state) {
                Ok(()) => Response::Done,
                Err(e) => Response::Error(e),
            },
            Request::SendGroupNavigation {
                device,
                op,
                key_state,
            } => match self.send_group_navigation_command(device, op, key_state) {
                Ok(()) => Response::Done,
                Err(e) => Response::Error(e),
            },
            Request::SetPlayerAppSettings(settings) => {
                match self.set_player_application_settings(&settings) {
                    Ok(()) => Response::Accepted(true),
                    Err(e) => {
                        warn!("[AVRCP] Player settings rejected: {}", e);
                        Response::Accepted(false)
                    }
                }
            }
            Request::StartFetchingAlbumArt {
                mime_type,
                height,
                width,
                max_size,
            } => {
                self.start_fetching_album_art(&mime_type, height, width, max_size);
                Response::Done
            }
            Request::GetMetadata => Response::Metadata(self.current_metadata()),
            Request::GetPlaybackState => Response::PlaybackState(self.current_playback_state()),
            Request::GetPlayerSettings => Response::PlayerSettings(self.current_player_settings()),
            Request::GetConnectedDevices => Response::ConnectedDevices(self.connected_devices()),
            Request::GetConnectionState(device) => {
                Response::ConnectionState(self.connection_state(device))
            }
            Request::Shutdown => {
                self.shutdown();
                Response::Done
            }
        }
    }
}
