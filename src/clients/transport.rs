//! The transport seam the resource graph talks through.

use std::fmt::Debug;
use std::future::Future;
use std::pin::Pin;

use crate::clients::errors::HttpError;
use crate::clients::http_client::HttpClient;
use crate::clients::http_request::HttpRequest;
use crate::clients::http_response::HttpResponse;

/// Boxed future returned by [`Transport::execute`].
pub type TransportFuture<'a> =
    Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>>;

/// Executes HTTP requests on behalf of models and collections.
///
/// [`HttpClient`] is the production implementation. Implementations must
/// return `Err(HttpError::Response(..))` for non-2xx statuses so that
/// callers can map `404` and `405` to their semantic errors.
pub trait Transport: Send + Sync + Debug {
    /// Sends one request. Implementations must not retry.
    fn execute(&self, request: HttpRequest) -> TransportFuture<'_>;
}

impl Transport for HttpClient {
    fn execute(&self, request: HttpRequest) -> TransportFuture<'_> {
        Box::pin(self.request(request))
    }
}
