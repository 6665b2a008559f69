use snipdoc_api::ApiClient;
use snipdoc_output::OutputRenderer;

pub struct GistContext<'a> {
    pub client: ApiClient,
    pub renderer: &'a OutputRenderer,
}
