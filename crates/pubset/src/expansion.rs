use crate::repository::{ContentRepository, Resource};

/// Child resource holding the shared structure of an authored template.
pub const STRUCTURE_CHILD: &str = "structure";

/// Derived paths that must accompany the seeds.
///
/// A page built on a structural template pulls in the template itself and its
/// structure child. Only the additional paths are returned; the seed list is
/// left untouched and duplicates are resolved downstream.
pub fn expand<R: ContentRepository>(repository: &R, seeds: &[String]) -> Vec<String> {
    let mut additional = Vec::new();

    for path in seeds {
        if path.is_empty() {
            continue;
        }
        let Some(resource) = repository.resolve(path) else {
            continue;
        };
        additional.extend(template_paths(repository, &resource));
    }

    additional
}

fn template_paths<R: ContentRepository>(repository: &R, resource: &Resource) -> Vec<String> {
    let mut paths = Vec::new();

    let mut template = repository.try_as_template(resource);
    let page = repository.try_as_page(resource);
    if template.is_none() && page.is_none() {
        return paths;
    }

    // A page defers to the template it is based on.
    if let Some(page) = page {
        template = page
            .template_path
            .and_then(|template_path| repository.resolve(&template_path))
            .and_then(|template_resource| repository.try_as_template(&template_resource));
    }

    if let Some(template) = template {
        if template.structure_support {
            paths.push(template.path.clone());

            let structure_path = format!("{}/{STRUCTURE_CHILD}", template.path);
            if let Some(structure) = repository.resolve(&structure_path) {
                paths.push(structure.path().to_string());
            }
        }
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryRepository;

    fn seeds(paths: &[&str]) -> Vec<String> {
        paths.iter().map(|path| path.to_string()).collect()
    }

    #[test]
    fn page_on_structural_template_pulls_template_and_structure_child() {
        let mut repo = InMemoryRepository::new();
        repo.add_template("/conf/templates/article", true);
        repo.add_resource("/conf/templates/article/structure");
        repo.add_page("/content/site/news", Some("/conf/templates/article"));

        let additional = expand(&repo, &seeds(&["/content/site/news"]));

        assert_eq!(
            additional,
            vec![
                "/conf/templates/article".to_string(),
                "/conf/templates/article/structure".to_string(),
            ]
        );
    }

    #[test]
    fn template_without_structure_support_contributes_nothing() {
        let mut repo = InMemoryRepository::new();
        repo.add_template("/conf/templates/plain", false);
        repo.add_page("/content/site/plain", Some("/conf/templates/plain"));

        assert!(expand(&repo, &seeds(&["/content/site/plain"])).is_empty());
    }

    #[test]
    fn missing_structure_child_still_yields_the_template() {
        let mut repo = InMemoryRepository::new();
        repo.add_template("/conf/templates/bare", true);
        repo.add_page("/content/site/bare", Some("/conf/templates/bare"));

        assert_eq!(
            expand(&repo, &seeds(&["/content/site/bare"])),
            vec!["/conf/templates/bare".to_string()]
        );
    }

    #[test]
    fn structural_template_as_seed_contributes_its_own_path() {
        let mut repo = InMemoryRepository::new();
        repo.add_template("/conf/templates/article", true);
        repo.add_resource("/conf/templates/article/structure");

        let additional = expand(&repo, &seeds(&["/conf/templates/article"]));

        assert_eq!(
            additional,
            vec![
                "/conf/templates/article".to_string(),
                "/conf/templates/article/structure".to_string(),
            ]
        );
    }

    #[test]
    fn unresolvable_and_empty_seeds_are_skipped() {
        let repo = InMemoryRepository::new();
        assert!(expand(&repo, &seeds(&["", "/content/ghost"])).is_empty());
    }

    #[test]
    fn plain_resources_contribute_nothing() {
        let mut repo = InMemoryRepository::new();
        repo.add_resource("/content/dam/picture.png");

        assert!(expand(&repo, &seeds(&["/content/dam/picture.png"])).is_empty());
    }

    #[test]
    fn page_without_template_binding_contributes_nothing() {
        let mut repo = InMemoryRepository::new();
        repo.add_page("/content/site/unbound", None);

        assert!(expand(&repo, &seeds(&["/content/site/unbound"])).is_empty());
    }
}
