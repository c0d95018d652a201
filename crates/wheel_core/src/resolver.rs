use std::sync::Arc;

use futures::{future::BoxFuture, FutureExt};
use shared::{ResultKind, ResultPayload, Sector};
use tracing::{debug, warn};

use crate::fetch::ImageFetcher;

pub enum Resolution {
    Ready(ResultPayload),
    Pending(BoxFuture<'static, ResultPayload>),
}

impl Resolution {
    pub fn is_pending(&self) -> bool {
        matches!(self, Resolution::Pending(_))
    }
}

#[derive(Clone)]
pub struct OutcomeResolver {
    fetcher: Arc<dyn ImageFetcher>,
}

impl OutcomeResolver {
    pub fn new(fetcher: Arc<dyn ImageFetcher>) -> Self {
        Self { fetcher }
    }

    pub fn resolve(&self, sector: &Sector) -> Resolution {
        match sector.result_kind {
            ResultKind::Text => Resolution::Ready(ResultPayload::Text(sector.display_text.to_string())),
            ResultKind::Image => {
                let fetcher = Arc::clone(&self.fetcher);
                let color = sector.color;
                Resolution::Pending(
                    async move {
                        match fetcher.fetch_image().await {
                            Ok(image) => {
                                debug!(?color, width = image.width(), height = image.height(), "image result ready");
                                ResultPayload::Image(image)
                            }
                            Err(err) => {
                                warn!(?color, "image result failed: {err}");
                                ResultPayload::Failed(err)
                            }
                        }
                    }
                    .boxed(),
                )
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/resolver_tests.rs"]
mod tests;
