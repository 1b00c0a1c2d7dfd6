/// A host whose page URLs embed an image rather than serve one.
///
/// Register one strategy per host; the resolver asks each in turn whether it
/// handles a URL and, if so, fetches the page and calls [`extract`].
///
/// [`extract`]: ContentPageStrategy::extract
pub trait ContentPageStrategy: Send + Sync {
    /// Name for logging.
    fn name(&self) -> &str;

    fn can_handle(&self, url: &str) -> bool;

    /// Direct asset URL found in the page body, if any.
    fn extract(&self, html: &str) -> Option<String>;
}
