use super::*;
use crate::application::dto::ComponentOrder;
use crate::application::read_models::SbomReadModel;
use crate::sbom_generation::domain::{
    ExternalReference, ExternalReferenceType, License, ProjectInfo, RawCoordinates,
    ResolvedBuild, ResolvedNode, ResolvedScope, Supplier,
};
use crate::sbom_generation::services::BuildEnvironment;
use std::cell::RefCell;
use std::path::{Path, PathBuf};

// Mock implementations for testing
struct MockResolutionReader {
    build: ResolvedBuild,
}

impl ResolutionReader for MockResolutionReader {
    fn read_resolution(&self, _path: &Path) -> Result<ResolvedBuild> {
        Ok(self.build.clone())
    }
}

struct FailingResolutionReader;

impl ResolutionReader for FailingResolutionReader {
    fn read_resolution(&self, path: &Path) -> Result<ResolvedBuild> {
        anyhow::bail!("cannot read {}", path.display())
    }
}

/// Metadata keyed by `group:name:version`
#[derive(Default)]
struct MockMetadataRepository {
    sources: HashMap<String, MetadataSource>,
    fail: bool,
}

impl MetadataRepository for MockMetadataRepository {
    fn lookup(&self, key: &ComponentKey) -> Result<Vec<MetadataSource>> {
        if self.fail {
            anyhow::bail!("repository offline");
        }
        Ok(self.sources.get(&key.coordinates()).cloned().into_iter().collect())
    }
}

#[derive(Default)]
struct MockProgressReporter {
    errors: RefCell<Vec<String>>,
}

impl ProgressReporter for MockProgressReporter {
    fn report(&self, _message: &str) {}
    fn report_progress(&self, _current: usize, _total: usize, _message: Option<&str>) {}
    fn report_error(&self, message: &str) {
        self.errors.borrow_mut().push(message.to_string());
    }
    fn report_completion(&self, _message: &str) {}
}

fn node(id: &str, group: &str, name: &str, version: &str) -> ResolvedNode {
    ResolvedNode::new(id, RawCoordinates::new(group, name, version))
}

fn scope(name: &str, roots: &[&str], nodes: Vec<ResolvedNode>) -> ResolvedScope {
    ResolvedScope {
        name: name.to_string(),
        roots: roots.iter().map(|r| r.to_string()).collect(),
        nodes,
    }
}

fn module(name: &str, scopes: Vec<ResolvedScope>) -> ResolvedModule {
    ResolvedModule {
        project: ProjectInfo {
            coordinates: RawCoordinates::new("com.acme", name, "1.0"),
            path: Some(format!(":{}", name)),
            package_type: None,
            metadata: None,
        },
        scopes,
    }
}

/// Module M declares core:1.0 and util:2.0; util depends on core
fn scenario_module(name: &str) -> ResolvedModule {
    module(
        name,
        vec![scope(
            "runtimeClasspath",
            &["core", "util"],
            vec![
                node("core", "lib", "core", "1.0"),
                node("util", "lib", "util", "2.0").depends_on(&["core"]),
            ],
        )],
    )
}

fn cyclic_module(name: &str) -> ResolvedModule {
    module(
        name,
        vec![scope(
            "runtimeClasspath",
            &["a"],
            vec![
                node("a", "lib", "a", "1.0").depends_on(&["b"]),
                node("b", "lib", "b", "1.0").depends_on(&["a"]),
            ],
        )],
    )
}

fn build_of(modules: Vec<ResolvedModule>) -> ResolvedBuild {
    ResolvedBuild {
        modules,
        descriptors: Vec::new(),
    }
}

fn reproducible_options() -> SbomOptions {
    SbomOptions {
        include_serial_number: false,
        source_date_epoch: Some(1_700_000_000),
        ..Default::default()
    }
}

fn use_case_for(
    build: ResolvedBuild,
) -> GenerateSbomUseCase<MockResolutionReader, MockMetadataRepository, MockProgressReporter> {
    GenerateSbomUseCase::new(
        MockResolutionReader { build },
        MockMetadataRepository::default(),
        MockProgressReporter::default(),
    )
}

fn request(options: SbomOptions) -> SbomRequest {
    SbomRequest::new(PathBuf::from("/build/resolution.json"), options)
}

fn depends_on<'a>(model: &'a SbomReadModel, bom_ref: &str) -> &'a [String] {
    &model
        .dependencies
        .iter()
        .find(|d| d.bom_ref == bom_ref)
        .unwrap()
        .depends_on
}

#[test]
fn test_execute_diamond_scenario() {
    let use_case = use_case_for(build_of(vec![scenario_module("m")]));

    let response = use_case.execute(request(reproducible_options())).unwrap();

    assert_eq!(response.documents.len(), 1);
    let model = &response.documents[0].model;
    let purls: Vec<&str> = model.components.iter().map(|c| c.purl.as_str()).collect();
    assert_eq!(purls, vec!["pkg:maven/lib/core@1.0", "pkg:maven/lib/util@2.0"]);
    assert_eq!(
        model.metadata.component.as_ref().unwrap().purl,
        "pkg:maven/com.acme/m@1.0"
    );

    assert_eq!(
        depends_on(model, "pkg:maven/com.acme/m@1.0"),
        &["pkg:maven/lib/core@1.0", "pkg:maven/lib/util@2.0"]
    );
    assert_eq!(
        depends_on(model, "pkg:maven/lib/util@2.0"),
        &["pkg:maven/lib/core@1.0"]
    );
    assert!(depends_on(model, "pkg:maven/lib/core@1.0").is_empty());
    assert_eq!(response.summary.succeeded, vec![":m".to_string()]);
    assert!(!response.summary.has_failures());
}

#[test]
fn test_execute_merges_metadata_across_modules() {
    let mut first = module(
        "a",
        vec![scope(
            "runtimeClasspath",
            &["core"],
            vec![node("core", "lib", "core", "1.0")],
        )],
    );
    first.scopes[0].nodes[0].metadata = Some(MetadataSource {
        licenses: vec![License::spdx("Apache-2.0")],
        ..Default::default()
    });
    let mut second = module(
        "b",
        vec![scope(
            "compileClasspath",
            &["core"],
            vec![node("core", "lib", "core", "1.0")],
        )],
    );
    second.scopes[0].nodes[0].metadata = Some(MetadataSource {
        supplier: Some(Supplier::named("Lib Org")),
        ..Default::default()
    });

    let use_case = use_case_for(build_of(vec![first, second]));
    let response = use_case.execute(request(reproducible_options())).unwrap();

    let model = &response.documents[0].model;
    let core: Vec<_> = model
        .components
        .iter()
        .filter(|c| c.name == "core")
        .collect();
    assert_eq!(core.len(), 1);
    assert_eq!(core[0].licenses[0].spdx_id.as_deref(), Some("Apache-2.0"));
    assert_eq!(
        core[0].supplier.as_ref().unwrap().name.as_deref(),
        Some("Lib Org")
    );

    // Default metadata component is the first module root, depending on the second
    assert_eq!(
        depends_on(model, "pkg:maven/com.acme/a@1.0"),
        &["pkg:maven/com.acme/b@1.0", "pkg:maven/lib/core@1.0"]
    );
}

#[test]
fn test_execute_isolates_failing_module() {
    let use_case = use_case_for(build_of(vec![cyclic_module("broken"), scenario_module("m")]));

    let response = use_case.execute(request(reproducible_options())).unwrap();

    assert!(response.summary.has_failures());
    assert_eq!(response.summary.failed[0].module, ":broken");
    assert!(response.summary.failed[0].reason.contains("cycle"));
    assert_eq!(response.summary.succeeded, vec![":m".to_string()]);

    let model = &response.documents[0].model;
    assert_eq!(
        model.metadata.component.as_ref().unwrap().purl,
        "pkg:maven/com.acme/m@1.0"
    );
    let names: Vec<&str> = model.components.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["core", "util"]);
}

#[test]
fn test_execute_excludes_module_closing_cross_module_cycle() {
    // Each module is acyclic; together they record core -> util -> core
    let second = module(
        "n",
        vec![scope(
            "runtimeClasspath",
            &["core"],
            vec![
                node("core", "lib", "core", "1.0").depends_on(&["util"]),
                node("util", "lib", "util", "2.0"),
            ],
        )],
    );
    let use_case = use_case_for(build_of(vec![scenario_module("m"), second]));

    let response = use_case.execute(request(reproducible_options())).unwrap();

    assert_eq!(response.summary.succeeded, vec![":m".to_string()]);
    assert_eq!(response.summary.failed[0].module, ":n");
    assert!(response.summary.failed[0]
        .reason
        .contains("lib:core:1.0 -> lib:util:2.0 -> lib:core:1.0"));
    assert!(use_case.progress_reporter.errors.borrow()[0].contains("Module ':n' excluded"));

    let model = &response.documents[0].model;
    assert!(depends_on(model, "pkg:maven/lib/core@1.0").is_empty());
    assert!(model
        .components
        .iter()
        .all(|c| c.purl != "pkg:maven/com.acme/n@1.0"));
}

#[test]
fn test_execute_fails_without_usable_graph() {
    let use_case = use_case_for(build_of(vec![cyclic_module("broken")]));

    let err = use_case
        .execute(request(reproducible_options()))
        .unwrap_err();

    assert!(err.to_string().contains("No module produced a usable dependency graph"));
}

#[test]
fn test_execute_propagates_reader_error() {
    let use_case = GenerateSbomUseCase::new(
        FailingResolutionReader,
        MockMetadataRepository::default(),
        MockProgressReporter::default(),
    );

    let err = use_case
        .execute(request(reproducible_options()))
        .unwrap_err();
    assert!(err.to_string().contains("cannot read /build/resolution.json"));
}

#[test]
fn test_execute_per_module_documents() {
    let use_case = use_case_for(build_of(vec![scenario_module("a"), scenario_module("b")]));
    let options = SbomOptions {
        aggregate: false,
        ..reproducible_options()
    };

    let response = use_case.execute(request(options)).unwrap();

    let names: Vec<&str> = response.documents.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec![":a", ":b"]);
    for document in &response.documents {
        assert_eq!(document.model.components.len(), 2);
    }
}

#[test]
fn test_execute_is_deterministic() {
    let build = build_of(vec![scenario_module("b"), scenario_module("a")]);
    let first = use_case_for(build.clone())
        .execute(request(reproducible_options()))
        .unwrap();
    let second = use_case_for(build)
        .execute(request(reproducible_options()))
        .unwrap();

    assert_eq!(first.documents[0].model, second.documents[0].model);
    assert_eq!(first.documents[0].model.metadata.timestamp, "2023-11-14T22:13:20Z");
    assert!(first.documents[0].model.metadata.serial_number.is_none());
}

#[test]
fn test_execute_declaration_order() {
    let use_case = use_case_for(build_of(vec![scenario_module("m")]));
    let options = SbomOptions {
        component_order: ComponentOrder::Declaration,
        ..reproducible_options()
    };

    let response = use_case.execute(request(options)).unwrap();

    let names: Vec<&str> = response.documents[0]
        .model
        .components
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names, vec!["core", "util"]);
}

#[test]
fn test_execute_excludes_unresolved_edges() {
    let mut unresolved = node("ghost", "lib", "ghost", "1.0");
    unresolved.unresolved = true;
    let build = build_of(vec![module(
        "m",
        vec![scope("runtimeClasspath", &["ghost"], vec![unresolved])],
    )]);

    let included = use_case_for(build.clone())
        .execute(request(reproducible_options()))
        .unwrap();
    let model = &included.documents[0].model;
    assert_eq!(
        depends_on(model, "pkg:maven/com.acme/m@1.0"),
        &["pkg:maven/lib/ghost@1.0"]
    );
    assert_eq!(included.summary.warnings, 1);

    let options = SbomOptions {
        unresolved_edges: UnresolvedEdgePolicy::Exclude,
        ..reproducible_options()
    };
    let excluded = use_case_for(build).execute(request(options)).unwrap();
    let model = &excluded.documents[0].model;
    assert!(depends_on(model, "pkg:maven/com.acme/m@1.0").is_empty());
    assert_eq!(model.components.len(), 1);
    assert_eq!(model.components[0].properties[0].name, "cdx:gradle:unresolved");
}

#[test]
fn test_execute_applies_descriptors_then_repository() {
    let mut build = build_of(vec![scenario_module("m")]);
    build.descriptors.push(ComponentDescriptor {
        coordinates: RawCoordinates::new("lib", "core", "1.0"),
        metadata: MetadataSource {
            supplier: Some(Supplier::named("Descriptor Org")),
            description: Some("Core library".to_string()),
            ..Default::default()
        },
    });

    let mut repository = MockMetadataRepository::default();
    repository.sources.insert(
        "lib:core:1.0".to_string(),
        MetadataSource {
            authoritative: true,
            supplier: Some(Supplier::named("Override Org")),
            ..Default::default()
        },
    );

    let use_case = GenerateSbomUseCase::new(
        MockResolutionReader { build },
        repository,
        MockProgressReporter::default(),
    );
    let response = use_case.execute(request(reproducible_options())).unwrap();

    let core = &response.documents[0].model.components[0];
    assert_eq!(core.name, "core");
    assert_eq!(
        core.supplier.as_ref().unwrap().name.as_deref(),
        Some("Override Org")
    );
    assert_eq!(core.description.as_deref(), Some("Core library"));
}

#[test]
fn test_execute_without_metadata_resolution_applies_overrides_only() {
    let mut build = build_of(vec![scenario_module("m")]);
    build.modules[0].scopes[0].nodes[1].metadata = Some(MetadataSource {
        licenses: vec![License::spdx("MIT")],
        ..Default::default()
    });
    build.descriptors.push(ComponentDescriptor {
        coordinates: RawCoordinates::new("lib", "core", "1.0"),
        metadata: MetadataSource {
            description: Some("Core library".to_string()),
            ..Default::default()
        },
    });

    let mut repository = MockMetadataRepository::default();
    repository.sources.insert(
        "lib:core:1.0".to_string(),
        MetadataSource {
            authoritative: true,
            supplier: Some(Supplier::named("Override Org")),
            ..Default::default()
        },
    );
    repository.sources.insert(
        "lib:util:2.0".to_string(),
        MetadataSource {
            licenses: vec![License::spdx("Apache-2.0")],
            ..Default::default()
        },
    );

    let use_case = GenerateSbomUseCase::new(
        MockResolutionReader { build },
        repository,
        MockProgressReporter::default(),
    );
    let options = SbomOptions {
        include_metadata_resolution: false,
        ..reproducible_options()
    };
    let response = use_case.execute(request(options)).unwrap();

    let components = &response.documents[0].model.components;
    let (core, util) = (&components[0], &components[1]);
    assert_eq!(
        core.supplier.as_ref().unwrap().name.as_deref(),
        Some("Override Org")
    );
    assert_eq!(core.description, None);
    assert!(util.licenses.is_empty());
}

#[test]
fn test_execute_license_text_only_when_requested() {
    let mut build = build_of(vec![scenario_module("m")]);
    build.modules[0].scopes[0].nodes[0].metadata = Some(MetadataSource {
        licenses: vec![
            License::spdx("MIT").with_text("Permission is hereby granted"),
            License::new(None, None, None, Some("Custom terms".to_string())),
        ],
        ..Default::default()
    });

    let without_text = use_case_for(build.clone())
        .execute(request(reproducible_options()))
        .unwrap();
    let licenses = &without_text.documents[0].model.components[0].licenses;
    assert_eq!(licenses.len(), 1);
    assert_eq!(licenses[0].spdx_id.as_deref(), Some("MIT"));
    assert_eq!(licenses[0].text, None);

    let options = SbomOptions {
        include_license_text: true,
        ..reproducible_options()
    };
    let with_text = use_case_for(build).execute(request(options)).unwrap();
    let licenses = &with_text.documents[0].model.components[0].licenses;
    assert_eq!(licenses.len(), 2);
    assert_eq!(
        licenses[0].text.as_deref(),
        Some("Permission is hereby granted")
    );
}

#[test]
fn test_execute_metadata_component_references() {
    let environment = BuildEnvironment::new(
        [
            ("BUILD_URL".to_string(), "https://jenkins.example/job/5".to_string()),
            ("GIT_URL".to_string(), "https://github.com/acme/m.git".to_string()),
        ],
        None,
    );
    let options = SbomOptions {
        external_references: vec![ExternalReference::new(
            ExternalReferenceType::Website,
            "https://acme.example",
        )],
        build_environment: environment.clone(),
        ..reproducible_options()
    };
    let response = use_case_for(build_of(vec![scenario_module("m")]))
        .execute(request(options))
        .unwrap();

    let references: Vec<(String, String)> = response.documents[0]
        .model
        .metadata
        .component
        .as_ref()
        .unwrap()
        .external_references
        .iter()
        .map(|r| (r.reference_type.clone(), r.url.clone()))
        .collect();
    assert_eq!(
        references,
        vec![
            ("website".to_string(), "https://acme.example".to_string()),
            (
                "build-system".to_string(),
                "https://jenkins.example/job/5".to_string()
            ),
            ("vcs".to_string(), "https://github.com/acme/m.git".to_string()),
        ]
    );
    // Dependencies never receive build references
    assert!(response.documents[0].model.components[0]
        .external_references
        .is_empty());

    // A configured VCS reference wins over GIT_URL; the build reference can be disabled
    let options = SbomOptions {
        external_references: vec![ExternalReference::new(
            ExternalReferenceType::Vcs,
            "https://github.com/acme/configured.git",
        )],
        include_build_system: false,
        build_environment: environment,
        ..reproducible_options()
    };
    let response = use_case_for(build_of(vec![scenario_module("m")]))
        .execute(request(options))
        .unwrap();
    let metadata_component = response.documents[0].model.metadata.component.as_ref().unwrap();
    assert_eq!(metadata_component.external_references.len(), 1);
    assert_eq!(
        metadata_component.external_references[0].url,
        "https://github.com/acme/configured.git"
    );
}

#[test]
fn test_execute_repository_failure_excludes_module() {
    let use_case = GenerateSbomUseCase::new(
        MockResolutionReader {
            build: build_of(vec![scenario_module("m")]),
        },
        MockMetadataRepository {
            fail: true,
            ..Default::default()
        },
        MockProgressReporter::default(),
    );

    let err = use_case
        .execute(request(reproducible_options()))
        .unwrap_err();
    assert!(err.to_string().contains("1 failed"));
}

#[test]
fn test_execute_module_filter() {
    let use_case = use_case_for(build_of(vec![scenario_module("app"), scenario_module("docs")]));
    let options = SbomOptions {
        skip_modules: vec![":docs".to_string()],
        ..reproducible_options()
    };

    let response = use_case.execute(request(options)).unwrap();

    assert_eq!(response.summary.skipped, vec![":docs".to_string()]);
    assert_eq!(response.summary.succeeded, vec![":app".to_string()]);
}

#[test]
fn test_execute_all_modules_skipped() {
    let use_case = use_case_for(build_of(vec![scenario_module("app")]));
    let options = SbomOptions {
        include_modules: vec![":other".to_string()],
        ..reproducible_options()
    };

    let err = use_case.execute(request(options)).unwrap_err();
    assert!(err.to_string().contains("1 skipped"));
}

#[test]
fn test_execute_configured_metadata_component() {
    let use_case = use_case_for(build_of(vec![scenario_module("a"), scenario_module("b")]));
    let options = SbomOptions {
        metadata_component: Some(RawCoordinates::new("com.acme", "platform", "2.0")),
        ..reproducible_options()
    };

    let response = use_case.execute(request(options)).unwrap();

    let document = &response.documents[0];
    assert_eq!(document.name, "platform");
    assert_eq!(
        depends_on(&document.model, "pkg:maven/com.acme/platform@2.0"),
        &["pkg:maven/com.acme/a@1.0", "pkg:maven/com.acme/b@1.0"]
    );
    assert_eq!(document.model.dependencies[0].bom_ref, "pkg:maven/com.acme/platform@2.0");
}

#[test]
fn test_execute_reports_unmatched_exclusion() {
    let reporter = MockProgressReporter::default();
    let use_case = GenerateSbomUseCase::new(
        MockResolutionReader {
            build: build_of(vec![scenario_module("m")]),
        },
        MockMetadataRepository::default(),
        reporter,
    );
    let options = SbomOptions {
        exclude_artifacts: vec!["org.nothing".to_string(), "lib:util".to_string()],
        ..reproducible_options()
    };

    let response = use_case.execute(request(options)).unwrap();

    let names: Vec<&str> = response.documents[0]
        .model
        .components
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names, vec!["core"]);

    let errors = use_case.progress_reporter.errors.borrow();
    assert!(errors
        .iter()
        .any(|e| e.contains("Exclude pattern 'org.nothing' did not match")));
    assert!(!errors.iter().any(|e| e.contains("'lib:util'")));
}

#[test]
fn test_execute_invalid_pattern_is_rejected() {
    let use_case = use_case_for(build_of(vec![scenario_module("m")]));
    let options = SbomOptions {
        exclude_artifacts: vec!["a:b:c:d".to_string()],
        ..reproducible_options()
    };

    assert!(use_case.execute(request(options)).is_err());
}
