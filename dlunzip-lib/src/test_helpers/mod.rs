pub mod archive;
pub mod mock_download_client;
pub mod recording_surface;
