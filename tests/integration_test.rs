/// Integration tests for the application layer
///
/// These tests drive RunScanUseCase through the public API against real
/// project fixtures on disk, with the network and console ports mocked.
mod test_utilities;

use polybom::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use test_utilities::mocks::*;

fn write_npm_project(dir: &Path) {
    fs::write(
        dir.join("package.json"),
        r#"{
    "name": "web-app",
    "version": "2.1.0",
    "dependencies": { "lodash": "^4.17.0" },
    "devDependencies": { "esbuild": "^0.21.0" }
}"#,
    )
    .unwrap();
    fs::write(
        dir.join("package-lock.json"),
        r#"{
    "name": "web-app",
    "lockfileVersion": 3,
    "packages": {
        "": { "name": "web-app", "version": "2.1.0" },
        "node_modules/lodash": {
            "version": "4.17.21",
            "integrity": "sha512-v2kDEe57lecTulaDIuNTPy3Ry4gLGJ6Z1O3vE1krgXZNrsQ+LFTGHVxVjcXPs17LhbZVGedAJv8XZ1tvj5FvSg==",
            "license": "MIT"
        },
        "node_modules/esbuild": {
            "version": "0.21.5",
            "license": "MIT"
        }
    }
}"#,
    )
    .unwrap();
}

fn write_poetry_project(dir: &Path) {
    fs::write(
        dir.join("pyproject.toml"),
        r#"[tool.poetry]
name = "billing-service"
version = "1.2.0"

[tool.poetry.dependencies]
python = "^3.11"
httpx = ">=0.27,<1.0"

[tool.poetry.group.dev.dependencies]
pytest = ">=8.0"
"#,
    )
    .unwrap();
    fs::write(
        dir.join("poetry.lock"),
        r#"[[package]]
name = "httpx"
version = "0.27.2"

[package.dependencies]
certifi = ">=2023.1"

[[package]]
name = "certifi"
version = "2024.8.30"
files = [
    { file = "certifi-2024.8.30-py3-none-any.whl", hash = "sha256:922820b53db7a7257ffbda3f597266d435245903d80737e34f8a45ff3e3230d8" },
]

[[package]]
name = "pytest"
version = "8.3.3"
"#,
    )
    .unwrap();
}

fn write_nuget_project(dir: &Path) {
    fs::write(
        dir.join("Api.csproj"),
        r#"<Project Sdk="Microsoft.NET.Sdk">
  <PropertyGroup>
    <TargetFramework>net8.0</TargetFramework>
    <Version>3.0.0</Version>
  </PropertyGroup>
  <ItemGroup>
    <PackageReference Include="Newtonsoft.Json" Version="13.0.3" />
  </ItemGroup>
</Project>
"#,
    )
    .unwrap();
    fs::write(
        dir.join("packages.lock.json"),
        r#"{
    "version": 1,
    "dependencies": {
        "net8.0": {
            "Newtonsoft.Json": {
                "type": "Direct",
                "requested": "[13.0.3, )",
                "resolved": "13.0.3",
                "contentHash": "HrC5BXdl00IP9zeV+0Z848QWPAoCr9P3bDEZguI+gkLcBKAOxix/tLEAAHC+UvDNPv4a2d18lOReHMOagPa+zQ=="
            }
        }
    }
}"#,
    )
    .unwrap();
}

async fn scan(root: &Path, registry: Option<MockLicenseRegistry>, online: bool) -> ScanResponse {
    let mut use_case = RunScanUseCase::new(default_set(), registry, MockProgressReporter::new());
    let settings = AnalysisSettings::new(root.to_path_buf());
    use_case
        .execute(ScanRequest::new(settings, online))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_npm_scan_builds_components_licenses_and_hashes() {
    let dir = TempDir::new().unwrap();
    write_npm_project(dir.path());

    let response = scan(dir.path(), None, false).await;
    assert!(!response.has_errors());

    let model = &response.read_model;
    let root = model.components.iter().find(|c| c.is_root).unwrap();
    assert_eq!(root.name, "web-app");
    assert_eq!(root.version, "2.1.0");
    assert_eq!(root.ecosystem, "npm");

    let lodash = model.components.iter().find(|c| c.name == "lodash").unwrap();
    assert_eq!(lodash.license.spdx_id.as_deref(), Some("MIT"));
    assert_eq!(lodash.purl, "pkg:npm/lodash@4.17.21");
    let hash = lodash.content_hash.as_deref().unwrap();
    assert!(hash.starts_with("sha256:"));
    assert_eq!(hash.len(), "sha256:".len() + 64);
}

#[tokio::test]
async fn test_npm_dev_dependencies_link_by_default() {
    let dir = TempDir::new().unwrap();
    write_npm_project(dir.path());

    let response = scan(dir.path(), None, false).await;

    let model = &response.read_model;
    let root = model.components.iter().find(|c| c.is_root).unwrap();
    let esbuild = model
        .components
        .iter()
        .find(|c| c.name == "esbuild")
        .unwrap();
    let root_edges = model
        .dependencies
        .iter()
        .find(|d| d.bom_ref == root.bom_ref)
        .unwrap();
    assert!(root_edges.depends_on.contains(&esbuild.bom_ref));
    assert_eq!(root_edges.depends_on.len(), 2);
}

#[tokio::test]
async fn test_poetry_scan_links_transitive_dependencies() {
    let dir = TempDir::new().unwrap();
    write_poetry_project(dir.path());

    let response = scan(dir.path(), None, false).await;
    assert!(!response.has_errors());

    let model = &response.read_model;
    let httpx = model.components.iter().find(|c| c.name == "httpx").unwrap();
    let certifi = model
        .components
        .iter()
        .find(|c| c.name == "certifi")
        .unwrap();
    let httpx_edges = model
        .dependencies
        .iter()
        .find(|d| d.bom_ref == httpx.bom_ref)
        .unwrap();
    assert!(httpx_edges.depends_on.contains(&certifi.bom_ref));

    // the lock recorded a wheel hash for certifi
    assert!(certifi.content_hash.as_deref().unwrap().starts_with("sha256:"));

    // no virtual environment in the fixture, so licenses stay open
    assert!(response.warning_count >= 1);
    assert!(certifi.license.spdx_id.is_none());
    assert_eq!(certifi.license.display, "None");
}

#[tokio::test]
async fn test_exclude_groups_unlinks_but_keeps_components() {
    let dir = TempDir::new().unwrap();
    write_poetry_project(dir.path());

    let mut use_case = RunScanUseCase::new(
        default_set(),
        None::<MockLicenseRegistry>,
        MockProgressReporter::new(),
    );
    let mut settings = AnalysisSettings::new(dir.path().to_path_buf());
    settings.set_list("poetry.exclude-groups", vec!["dev".to_string()]);
    let response = use_case
        .execute(ScanRequest::new(settings, false))
        .await
        .unwrap();

    let model = &response.read_model;
    let root = model.components.iter().find(|c| c.is_root).unwrap();
    let pytest = model
        .components
        .iter()
        .find(|c| c.name == "pytest")
        .unwrap();
    let root_edges = model
        .dependencies
        .iter()
        .find(|d| d.bom_ref == root.bom_ref)
        .unwrap();
    assert!(!root_edges.depends_on.contains(&pytest.bom_ref));
}

#[tokio::test]
async fn test_scan_discovers_projects_in_subdirectories() {
    let dir = TempDir::new().unwrap();
    let backend = dir.path().join("backend");
    let frontend = dir.path().join("frontend");
    fs::create_dir_all(&backend).unwrap();
    fs::create_dir_all(&frontend).unwrap();
    write_poetry_project(&backend);
    write_npm_project(&frontend);

    let response = scan(dir.path(), None, false).await;

    let model = &response.read_model;
    let roots: Vec<_> = model.components.iter().filter(|c| c.is_root).collect();
    assert_eq!(roots.len(), 2);
    assert!(model
        .components
        .iter()
        .any(|c| c.ecosystem == "poetry" && !c.is_root));
    assert!(model
        .components
        .iter()
        .any(|c| c.ecosystem == "npm" && !c.is_root));
}

#[tokio::test]
async fn test_disabled_analyzer_contributes_nothing() {
    let dir = TempDir::new().unwrap();
    write_npm_project(dir.path());

    let mut use_case = RunScanUseCase::new(
        default_set(),
        None::<MockLicenseRegistry>,
        MockProgressReporter::new(),
    );
    let mut settings = AnalysisSettings::new(dir.path().to_path_buf());
    settings.set_flag("npm.disable", true);
    let response = use_case
        .execute(ScanRequest::new(settings, false))
        .await
        .unwrap();

    assert!(response.read_model.components.is_empty());
    assert!(!response.has_errors());
}

#[tokio::test]
async fn test_online_enrichment_fills_unresolved_licenses() {
    let dir = TempDir::new().unwrap();
    write_nuget_project(dir.path());

    let registry = MockLicenseRegistry::new().with_expression(
        Ecosystem::Nuget,
        "Newtonsoft.Json",
        "13.0.3",
        "MIT",
    );
    let handle = registry.clone();
    let response = scan(dir.path(), Some(registry), true).await;

    let component = response
        .read_model
        .components
        .iter()
        .find(|c| c.name == "Newtonsoft.Json")
        .unwrap();
    assert_eq!(component.license.spdx_id.as_deref(), Some("MIT"));
    // one unresolved library, one lookup
    assert_eq!(handle.calls(), 1);
}

#[tokio::test]
async fn test_online_enrichment_skips_locally_resolved_licenses() {
    let dir = TempDir::new().unwrap();
    write_npm_project(dir.path());

    let registry = MockLicenseRegistry::new();
    let handle = registry.clone();
    let response = scan(dir.path(), Some(registry), true).await;

    assert!(!response.has_errors());
    assert_eq!(handle.calls(), 0);
}

#[tokio::test]
async fn test_enrichment_failure_is_a_warning_not_an_error() {
    let dir = TempDir::new().unwrap();
    write_nuget_project(dir.path());

    let response = scan(dir.path(), Some(MockLicenseRegistry::with_failure()), true).await;

    assert!(!response.has_errors());
    assert!(response
        .read_model
        .diagnostics
        .iter()
        .any(|d| matches!(d.severity, SeverityView::Warning)
            && d.message.contains("License lookup")));
}

#[tokio::test]
async fn test_missing_lock_is_an_analysis_error() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("package.json"),
        r#"{ "name": "broken", "version": "1.0.0" }"#,
    )
    .unwrap();

    let response = scan(dir.path(), None, false).await;

    assert!(response.has_errors());
    assert!(response
        .read_model
        .diagnostics
        .iter()
        .any(|d| matches!(d.severity, SeverityView::Error)
            && d.message.contains("package-lock.json")));
}

#[tokio::test]
async fn test_cyclonedx_document_is_valid_and_promotes_the_root() {
    let dir = TempDir::new().unwrap();
    write_npm_project(dir.path());

    let response = scan(dir.path(), None, false).await;
    let document = CycloneDxFormatter::new()
        .format(&response.read_model)
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&document).unwrap();

    assert_eq!(value["bomFormat"], "CycloneDX");
    assert_eq!(value["specVersion"], "1.6");
    assert!(value["serialNumber"]
        .as_str()
        .unwrap()
        .starts_with("urn:uuid:"));

    let promoted = &value["metadata"]["component"];
    assert_eq!(promoted["type"], "application");
    assert_eq!(promoted["name"], "web-app");

    // the promoted root does not reappear in the component list
    let root_ref = promoted["bom-ref"].as_str().unwrap();
    let components = value["components"].as_array().unwrap();
    assert!(components
        .iter()
        .all(|c| c["bom-ref"].as_str() != Some(root_ref)));

    // but its dependency entry is still present
    let dependencies = value["dependencies"].as_array().unwrap();
    assert!(dependencies
        .iter()
        .any(|d| d["ref"].as_str() == Some(root_ref)));
}

#[tokio::test]
async fn test_markdown_document_renders_projects_and_components() {
    let dir = TempDir::new().unwrap();
    write_npm_project(dir.path());

    let response = scan(dir.path(), None, false).await;
    let document = MarkdownFormatter::new()
        .format(&response.read_model)
        .unwrap();

    assert!(document.starts_with("# Software Bill of Materials"));
    assert!(document.contains("## Scanned Projects"));
    assert!(document.contains("| web-app | 2.1.0 | npm |"));
    assert!(document.contains("### npm"));
    assert!(document.contains("| lodash | 4.17.21 | MIT | sha256:"));
    assert!(document.contains("No warnings or errors were recorded during the scan."));
}

#[tokio::test]
async fn test_progress_messages_flow_through_the_reporter() {
    let dir = TempDir::new().unwrap();
    write_npm_project(dir.path());

    let reporter = MockProgressReporter::new();
    let handle = reporter.clone();
    let mut use_case = RunScanUseCase::new(default_set(), None::<MockLicenseRegistry>, reporter);
    let settings = AnalysisSettings::new(dir.path().to_path_buf());
    use_case
        .execute(ScanRequest::new(settings, false))
        .await
        .unwrap();

    let messages = handle.get_messages();
    assert!(messages.iter().any(|m| m.contains("Scanning")));
    assert!(messages.iter().any(|m| m.contains("Analyzed")));
}

#[tokio::test]
async fn test_empty_directory_yields_empty_model() {
    let dir = TempDir::new().unwrap();

    let response = scan(dir.path(), None, false).await;

    assert!(!response.has_errors());
    assert!(response.read_model.components.is_empty());
    assert!(response.read_model.dependencies.is_empty());

    // an empty model still formats cleanly
    let document = CycloneDxFormatter::new()
        .format(&response.read_model)
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&document).unwrap();
    assert!(value["metadata"].get("component").is_none());
}

#[tokio::test]
async fn test_execute_through_the_scan_port() {
    let dir = TempDir::new().unwrap();
    write_npm_project(dir.path());

    let mut use_case = RunScanUseCase::new(
        default_set(),
        None::<MockLicenseRegistry>,
        MockProgressReporter::new(),
    );
    let port: &mut dyn ScanPort = &mut use_case;
    let settings = AnalysisSettings::new(dir.path().to_path_buf());
    let response = port
        .execute_scan(ScanRequest::new(settings, false))
        .await
        .unwrap();

    assert_eq!(
        response
            .read_model
            .components
            .iter()
            .filter(|c| c.is_root)
            .count(),
        1
    );
}
