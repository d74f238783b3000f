use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::context::DiscoveryContext;

/// One progress line per period while any deals are stored, until cancelled.
pub async fn log_progress(ctx: Arc<DiscoveryContext>, period: Duration, token: CancellationToken) {
    let mut ticker = tokio::time::interval(period);
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = ticker.tick() => {
                if let Some(line) = progress_line(&ctx).await {
                    info!("{}", line);
                }
            }
        }
    }
}

async fn progress_line(ctx: &DiscoveryContext) -> Option<String> {
    let stats = ctx.deals().read().await.stats();
    if stats.total == 0 {
        return None;
    }
    Some(format!(
        "Progress: {} deals found, {} new, avg price £{}",
        stats.total, stats.new_deals, stats.avg_price
    ))
}
