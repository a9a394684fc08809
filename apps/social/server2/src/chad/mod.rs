//! WebTransport server, i.e. "chad" transport.

use color_eyre::Result;

use crate::Args;

pub async fn launch_webtransport_server(_args: Args) -> Result<()> {
	std::future::pending().await
}
