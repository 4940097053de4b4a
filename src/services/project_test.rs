use time::macros::datetime;

use super::*;

// =============================================================================
// FAKE STORE
// =============================================================================

#[derive(Default)]
struct FakeStore {
    records: Vec<ProjectRecord>,
    fail: bool,
}

#[async_trait]
impl ProjectStore for FakeStore {
    async fn find_published(&self, slug: &str) -> Result<Option<ProjectRecord>, ProjectError> {
        if self.fail {
            return Err(ProjectError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(self.records.iter().find(|r| r.slug == slug).cloned())
    }

    async fn published_slugs(&self) -> Result<Vec<String>, ProjectError> {
        if self.fail {
            return Err(ProjectError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(self.records.iter().map(|r| r.slug.clone()).collect())
    }
}

fn record(slug: &str) -> ProjectRecord {
    ProjectRecord {
        slug: slug.to_owned(),
        title: "Bracket Redesign".to_owned(),
        description: "Lightweight bracket".to_owned(),
        category: "Mechanical".to_owned(),
        created_at: Some(datetime!(2024-03-02 23:30 UTC)),
        ..ProjectRecord::default()
    }
}

fn service(store: FakeStore) -> ProjectService {
    ProjectService::new(Some(Arc::new(store)), Catalog::builtin().unwrap())
}

// =============================================================================
// CONVERSION
// =============================================================================

#[test]
fn split_list_trims_and_drops_empty_entries() {
    assert_eq!(split_list(Some(" CFD, ,Aero ,")), vec!["CFD".to_owned(), "Aero".to_owned()]);
    assert!(split_list(Some("")).is_empty());
    assert!(split_list(None).is_empty());
}

#[test]
fn minimal_record_has_no_details_or_links() {
    let project = record("bracket").into_project();
    assert_eq!(project.id, "bracket");
    assert_eq!(project.short_description, project.description);
    assert_eq!(project.duration, "-");
    assert_eq!(project.completed_at, "2024-03-02");
    assert_eq!(project.status, ProjectStatus::Completed);
    assert!(project.tags.is_empty());
    assert!(project.technologies.is_empty());
    assert!(project.images.is_none());
    assert!(project.details.is_none());
    assert!(project.links.is_none());
    assert!(project.model_url.is_none());
}

#[test]
fn technologies_fall_back_to_tags() {
    let project = ProjectRecord { tags: Some("CFD, FEA".into()), ..record("a") }.into_project();
    assert_eq!(project.technologies, vec!["CFD".to_owned(), "FEA".to_owned()]);

    let project =
        ProjectRecord { tags: Some("CFD".into()), technologies: Some("ANSYS".into()), ..record("a") }.into_project();
    assert_eq!(project.technologies, vec!["ANSYS".to_owned()]);
}

#[test]
fn published_date_wins_over_created_date() {
    let project = ProjectRecord { published_at: Some(datetime!(2024-08-15 10:00 UTC)), ..record("a") }.into_project();
    assert_eq!(project.completed_at, "2024-08-15");
}

#[test]
fn completed_date_is_taken_in_utc() {
    let project = ProjectRecord { published_at: Some(datetime!(2024-08-15 01:00 +3)), ..record("a") }.into_project();
    assert_eq!(project.completed_at, "2024-08-14");
}

#[test]
fn results_alone_create_details_with_defaults() {
    let project = ProjectRecord { results: Some("Faster, Cheaper".into()), ..record("a") }.into_project();
    let details = project.details.unwrap();
    assert_eq!(details.problem, "Project details");
    assert_eq!(details.solution, "");
    assert_eq!(details.results.len(), 2);
    assert!(details.challenges.is_none());
    assert!(details.testimonial.is_none());
}

#[test]
fn solution_falls_back_to_content() {
    let project = ProjectRecord {
        problem: Some("Too heavy".into()),
        content: Some("Long write-up".into()),
        ..record("a")
    }
    .into_project();
    let details = project.details.unwrap();
    assert_eq!(details.problem, "Too heavy");
    assert_eq!(details.solution, "Long write-up");
}

#[test]
fn testimonial_needs_content_and_author() {
    let base = ProjectRecord {
        solution: Some("Topology optimisation".into()),
        testimonial_content: Some("Great work".into()),
        ..record("a")
    };
    assert!(base.clone().into_project().details.unwrap().testimonial.is_none());

    let with_author = ProjectRecord { testimonial_author: Some("Ada".into()), ..base };
    let testimonial = with_author.into_project().details.unwrap().testimonial.unwrap();
    assert_eq!(testimonial.author, "Ada");
    assert_eq!(testimonial.role, "");
    assert_eq!(testimonial.company, "");
}

#[test]
fn links_only_when_demo_or_github_present() {
    let project = ProjectRecord { github_url: Some("https://github.com/lny/x".into()), ..record("a") }.into_project();
    let links = project.links.unwrap();
    assert_eq!(links.github.as_deref(), Some("https://github.com/lny/x"));
    assert!(links.demo.is_none());
    assert!(links.case_study.is_none());
}

#[test]
fn page_meta_uses_thumbnail_and_keywords() {
    let full = ProjectRecord {
        tags: Some("CFD, Aero".into()),
        thumbnail_url: Some("/images/thumb.jpg".into()),
        ..record("a")
    };
    let project = full.clone().into_project();
    let meta = full.page_meta(&project);
    assert_eq!(meta.title, "Bracket Redesign - LnY");
    assert_eq!(meta.description, "Lightweight bracket");
    assert_eq!(meta.keywords, "CFD, Aero, LnY, project, Mechanical");
    assert_eq!(meta.images, vec!["/images/thumb.jpg".to_owned()]);

    let bare = record("b");
    assert!(bare.page_meta(&bare.clone().into_project()).images.is_empty());
}

#[test]
fn serialized_project_uses_page_field_names() {
    let project = ProjectRecord {
        glb_model_url: Some("/models/projects/a.glb".into()),
        demo_url: Some("/viewer".into()),
        ..record("a")
    }
    .into_project();
    let json = serde_json::to_value(&project).unwrap();
    assert_eq!(json["shortDescription"], "Lightweight bracket");
    assert_eq!(json["completedAt"], "2024-03-02");
    assert_eq!(json["status"], "completed");
    assert_eq!(json["glbUrl"], "/models/projects/a.glb");
    assert_eq!(json["links"]["demo"], "/viewer");
    assert!(json.get("details").is_none());
}

// =============================================================================
// RESOLUTION
// =============================================================================

#[tokio::test]
async fn database_record_wins_over_catalog() {
    let svc = service(FakeStore { records: vec![record("tubitak-1501")], ..FakeStore::default() });
    let resolved = svc.find_project("tubitak-1501").await.unwrap();
    assert_eq!(resolved.project.title, "Bracket Redesign");
}

#[tokio::test]
async fn unknown_slug_falls_back_to_catalog() {
    let svc = service(FakeStore::default());
    let resolved = svc.find_project("interaktif-3d-model").await.unwrap();
    assert_eq!(resolved.project.links.unwrap().demo.as_deref(), Some("/viewer"));
    assert_eq!(resolved.meta.images.len(), 2);
    assert!(resolved.meta.keywords.ends_with("LnY, project, Yazılım"));
}

#[tokio::test]
async fn database_error_falls_back_to_catalog() {
    let svc = service(FakeStore { fail: true, ..FakeStore::default() });
    assert!(svc.find_project("otomotiv-parca-cfd").await.is_some());
    assert!(svc.find_project("no-such-project").await.is_none());
}

#[tokio::test]
async fn no_database_uses_catalog_only() {
    let svc = ProjectService::new(None, Catalog::builtin().unwrap());
    assert!(svc.find_project("endustriyel-otomasyon").await.is_some());
    assert!(svc.find_project("bracket").await.is_none());
}

#[tokio::test]
async fn listing_merges_database_and_catalog_without_duplicates() {
    let svc = service(FakeStore { records: vec![record("bracket"), record("tubitak-1501")], ..FakeStore::default() });
    let slugs = svc.list_projects().await;
    assert_eq!(slugs[0], "bracket");
    assert_eq!(slugs[1], "tubitak-1501");
    assert_eq!(slugs.iter().filter(|s| *s == "tubitak-1501").count(), 1);
    assert_eq!(slugs.len(), 5);
}

#[tokio::test]
async fn listing_survives_database_error() {
    let svc = service(FakeStore { fail: true, ..FakeStore::default() });
    assert_eq!(svc.list_projects().await.len(), 4);
}

#[test]
fn builtin_catalog_has_four_projects_with_models() {
    let catalog = Catalog::builtin().unwrap();
    let slugs: Vec<_> = catalog.slugs().collect();
    assert_eq!(slugs, ["otomotiv-parca-cfd", "endustriyel-otomasyon", "interaktif-3d-model", "tubitak-1501"]);
    for slug in slugs {
        let project = catalog.find(slug).unwrap();
        assert!(project.model_url.as_deref().is_some_and(|u| u.starts_with("/models/projects/")));
        assert_eq!(project.links.as_ref().unwrap().case_study.as_deref(), Some(format!("/projects/{slug}").as_str()));
    }
}
