use snipdoc_api::ApiClient;
use snipdoc_output::OutputRenderer;

pub struct ConfluenceContext<'a> {
    pub client: ApiClient,
    pub renderer: &'a OutputRenderer,
}
