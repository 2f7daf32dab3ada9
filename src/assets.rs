//! Image id to url resolution.

use crate::catalog::RelatedObjectGraph;

pub struct AssetResolver<'a> {
    graph: &'a RelatedObjectGraph,
}

impl<'a> AssetResolver<'a> {
    pub fn new(graph: &'a RelatedObjectGraph) -> Self {
        Self { graph }
    }

    /// Maps image ids to urls, dropping ids missing from the graph.
    ///
    /// The resolved urls keep the relative order of their ids. With
    /// `expect_images` set, every unresolved id is logged as a warning.
    pub fn resolve(&self, image_ids: &[String], expect_images: bool) -> Vec<String> {
        let mut urls = Vec::with_capacity(image_ids.len());
        for id in image_ids {
            match self.graph.image_url(id) {
                Some(url) => urls.push(url.to_string()),
                None if expect_images => {
                    tracing::warn!(image_id = %id, "Image not found in related objects");
                }
                None => {}
            }
        }
        urls
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RelatedObject;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_missing_ids_dropped_in_order() {
        let graph = RelatedObjectGraph::build(vec![
            RelatedObject::image("a", "https://img/a.jpg"),
            RelatedObject::image("c", "https://img/c.jpg"),
        ]);
        let resolver = AssetResolver::new(&graph);

        let urls = resolver.resolve(&ids(&["a", "b", "c"]), true);
        assert_eq!(urls, vec!["https://img/a.jpg", "https://img/c.jpg"]);
    }

    #[test]
    fn test_order_follows_item_not_graph() {
        let graph = RelatedObjectGraph::build(vec![
            RelatedObject::image("a", "https://img/a.jpg"),
            RelatedObject::image("b", "https://img/b.jpg"),
        ]);
        let urls = AssetResolver::new(&graph).resolve(&ids(&["b", "a"]), false);
        assert_eq!(urls, vec!["https://img/b.jpg", "https://img/a.jpg"]);
    }

    #[test]
    fn test_category_ids_are_not_images() {
        let graph = RelatedObjectGraph::build(vec![RelatedObject::category("a", "ALFAJORES")]);
        let urls = AssetResolver::new(&graph).resolve(&ids(&["a"]), true);
        assert!(urls.is_empty());
    }

    #[test]
    fn test_no_ids() {
        let graph = RelatedObjectGraph::default();
        assert!(AssetResolver::new(&graph).resolve(&[], true).is_empty());
    }
}
