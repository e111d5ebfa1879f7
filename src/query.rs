//! Query building: from a [`SearchRequest`] to a provider request.

use crate::models::{ProviderQuery, SearchRequest};
use crate::providers::NewsProvider;
use tracing::debug;

/// Build the provider request for a search.
///
/// Never fails: an unrecognized category has already been folded into
/// [`Category::Unset`](crate::models::Category::Unset) and falls back to the
/// default query.
pub fn build(provider: &dyn NewsProvider, request: &SearchRequest) -> ProviderQuery {
    let search = request.effective_query();
    let query = provider.build_query(search);
    debug!(
        provider = provider.name(),
        category = %request.category,
        search,
        url = %query.redacted_url(),
        "Built provider query"
    );
    query
}
