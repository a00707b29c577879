use tracing::debug;

use super::namespace_resolver::NamespaceResolver;
use crate::domain::entities::{ApplyPlan, Manifest};

/// マニフェストをネームスペースごとにまとめて適用計画を作る
///
/// ネームスペースを解決できないマニフェストは黙って除外する（失敗として
/// 数えない）。重複排除や命名規則の検証は行わない。
pub fn build_plan<I>(resolver: &NamespaceResolver, manifests: I) -> ApplyPlan
where
    I: IntoIterator<Item = Manifest>,
{
    let mut plan = ApplyPlan::new();

    for manifest in manifests {
        match resolver.resolve(&manifest) {
            Ok(namespace) => plan.push(namespace, manifest),
            Err(reason) => {
                debug!(
                    manifest = %manifest.relative_path(),
                    %reason,
                    "Skipping manifest without namespace"
                );
            }
        }
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::manifest_classifier::classify_manifests;
    use crate::domain::entities::Entry;
    use crate::domain::value_objects::NamespaceName;
    use pretty_assertions::assert_eq;

    fn entries() -> Vec<Entry> {
        vec![
            Entry::directory("/r/team-a", "team-a"),
            Entry::file("/r/team-a/deploy.yaml", "team-a/deploy.yaml"),
            Entry::directory("/r/team-a/sub", "team-a/sub"),
            Entry::file("/r/team-a/sub/svc.yml", "team-a/sub/svc.yml"),
            Entry::directory("/r/team-b", "team-b"),
            Entry::file("/r/team-b/cfg.YAML", "team-b/cfg.YAML"),
            Entry::file("/r/readme.txt", "readme.txt"),
            Entry::file("/r/root.yaml", "root.yaml"),
        ]
    }

    #[test]
    fn test_plan_groups_by_first_segment() {
        let resolver = NamespaceResolver::new("/r");
        let plan = build_plan(&resolver, classify_manifests(entries()));

        let team_a = NamespaceName::new("team-a").unwrap();
        let team_b = NamespaceName::new("team-b").unwrap();

        let a_files: Vec<&str> = plan
            .manifests(&team_a)
            .unwrap()
            .iter()
            .map(|m| m.relative_path())
            .collect();
        let b_files: Vec<&str> = plan
            .manifests(&team_b)
            .unwrap()
            .iter()
            .map(|m| m.relative_path())
            .collect();

        assert_eq!(a_files, vec!["team-a/deploy.yaml", "team-a/sub/svc.yml"]);
        assert_eq!(b_files, vec!["team-b/cfg.YAML"]);
        assert_eq!(plan.namespace_count(), 2);
    }

    #[test]
    fn test_root_level_manifest_is_dropped_silently() {
        let resolver = NamespaceResolver::new("/r");
        let plan = build_plan(&resolver, classify_manifests(entries()));

        assert!(plan
            .iter()
            .flat_map(|(_, files)| files.iter())
            .all(|m| m.relative_path() != "root.yaml"));
    }

    #[test]
    fn test_every_resolvable_manifest_appears_exactly_once() {
        let resolver = NamespaceResolver::new("/r");
        let manifests = classify_manifests(entries());
        let resolvable = manifests
            .iter()
            .filter(|m| resolver.resolve(m).is_ok())
            .count();

        let plan = build_plan(&resolver, manifests);
        assert_eq!(plan.manifest_count(), resolvable);
    }

    #[test]
    fn test_only_root_level_files_yield_empty_plan() {
        let resolver = NamespaceResolver::new("/r");
        let plan = build_plan(
            &resolver,
            classify_manifests(vec![Entry::file("/r/a.yaml", "a.yaml")]),
        );
        assert!(plan.is_empty());
    }
}
