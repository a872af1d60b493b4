//! Install a single release: lookup, select, download, extract, place.

use ghinst_core::Reporter;
use ghinst_core::io::download::DownloadRequest;
use ghinst_core::io::extract::extract_file;
use ghinst_core::select::select_for_platform;
use ghinst_core::store::{Installed, install_binary};
use ghinst_schema::Target;
use tracing::info;

use super::{Context, InstallError};

/// What an install produced.
#[derive(Debug, Clone)]
pub struct InstallOutcome {
    /// Tag of the installed release (resolved when the target asked for latest).
    pub tag: String,
    /// Name of the downloaded asset.
    pub asset: String,
    pub installed: Installed,
}

/// Run the full pipeline for `target`.
///
/// Every failure aborts the run. Temporary files are dropped on all paths and
/// the store rolls back a partially written version directory.
pub async fn install(ctx: &Context, target: &Target) -> Result<InstallOutcome, InstallError> {
    let reporter = &ctx.reporter;

    reporter.section("Resolving");
    let release = ctx.github.fetch_release(target).await?;
    let asset = select_for_platform(&release.assets, ctx.platform)?.clone();
    info!(target = %target, tag = %release.tag_name, asset = %asset.name, "selected asset");
    reporter.info(&format!("{} {} -> {}", target.slug(), release.tag_name, asset.name));

    reporter.section("Downloading");
    let archive = DownloadRequest::new(ctx.github.http(), &asset.download_url, &asset.name, reporter)
        .with_token(ctx.github.token())
        .with_expected_size(asset.size)
        .execute()
        .await?;

    reporter.extracting(&asset.name);
    let asset_name = asset.name.clone();
    // The archive temp file moves into the task and is deleted when it ends
    let payload =
        tokio::task::spawn_blocking(move || extract_file(archive.path(), &asset_name)).await??;

    reporter.section("Installing");
    let installed = install_binary(
        &ctx.layout,
        &target.owner,
        &target.repo,
        &release.tag_name,
        &payload,
        reporter,
    )?;

    Ok(InstallOutcome {
        tag: release.tag_name,
        asset: asset.name,
        installed,
    })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use ghinst_core::registry::GithubClient;
    use ghinst_core::{Layout, NullReporter};
    use ghinst_schema::{Arch, Os, Platform};
    use mockito::Server;
    use std::sync::Arc;

    fn tar_gz(name: &str, body: &[u8]) -> Vec<u8> {
        let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
        let mut header = tar::Header::new_gnu();
        header.set_size(body.len() as u64);
        header.set_mode(0o755);
        header.set_cksum();
        builder.append_data(&mut header, name, body).unwrap();
        builder.into_inner().unwrap().finish().unwrap()
    }

    fn context(server: &Server, root: &std::path::Path) -> Context {
        let github = GithubClient::new(reqwest::Client::new(), None).with_api_base(server.url());
        Context::new(
            Layout::new(root),
            github,
            Platform::new(Os::Linux, Arch::Amd64),
            Arc::new(NullReporter),
        )
    }

    #[tokio::test]
    async fn test_install_pipeline() {
        let mut server = Server::new_async().await;
        let archive = tar_gz("tool-1.0/tool", b"#!/bin/sh\n");
        let release = format!(
            r#"{{"tag_name":"v1.0.0","assets":[
                {{"name":"tool_linux_amd64.tar.gz.sha256","browser_download_url":"{url}/sum","size":64}},
                {{"name":"tool_linux_amd64.tar.gz","browser_download_url":"{url}/dl","size":{size}}},
                {{"name":"tool_darwin_arm64.tar.gz","browser_download_url":"{url}/mac","size":1}}
            ]}}"#,
            url = server.url(),
            size = archive.len()
        );
        let _api = server
            .mock("GET", "/repos/acme/tool/releases/latest")
            .with_status(200)
            .with_body(release)
            .create_async()
            .await;
        let dl = server
            .mock("GET", "/dl")
            .with_status(200)
            .with_body(archive)
            .create_async()
            .await;

        let tmp = tempfile::tempdir().unwrap();
        let ctx = context(&server, tmp.path());
        let outcome = install(&ctx, &Target::parse("acme/tool").unwrap()).await.unwrap();

        dl.assert_async().await;
        assert_eq!(outcome.tag, "v1.0.0");
        assert_eq!(outcome.asset, "tool_linux_amd64.tar.gz");
        assert_eq!(outcome.installed.binary, tmp.path().join("acme/tool@v1.0.0/tool"));
        assert_eq!(std::fs::read(&outcome.installed.link).unwrap(), b"#!/bin/sh\n");
    }

    #[tokio::test]
    async fn test_install_reports_available_assets() {
        let mut server = Server::new_async().await;
        let _api = server
            .mock("GET", "/repos/acme/tool/releases/tags/v2")
            .with_status(200)
            .with_body(
                r#"{"tag_name":"v2","assets":[
                    {"name":"tool_windows_amd64.zip","browser_download_url":"http://x/1"},
                    {"name":"tool_linux_amd64.deb","browser_download_url":"http://x/2"}
                ]}"#,
            )
            .create_async()
            .await;

        let tmp = tempfile::tempdir().unwrap();
        let ctx = context(&server, tmp.path());
        let err = install(&ctx, &Target::parse("acme/tool@v2").unwrap())
            .await
            .unwrap_err();

        assert_eq!(
            err.available_assets().unwrap(),
            ["tool_windows_amd64.zip", "tool_linux_amd64.deb"]
        );
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_missing_release() {
        let mut server = Server::new_async().await;
        let _api = server
            .mock("GET", "/repos/acme/tool/releases/latest")
            .with_status(404)
            .create_async()
            .await;

        let tmp = tempfile::tempdir().unwrap();
        let ctx = context(&server, tmp.path());
        let err = install(&ctx, &Target::parse("acme/tool").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            InstallError::Registry(ghinst_core::registry::RegistryError::NotFound(_))
        ));
    }
}
