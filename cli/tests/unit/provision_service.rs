//! Tests for the provisioning pass: ordering, halt-or-continue decisions,
//! and repeatability across runs.

#![allow(clippy::expect_used)]

use std::path::Path;

use siteup_cli::application::services::provision::{
    Host, ProvisionInput, ProvisionReport, ProvisionState, provision,
};
use siteup_cli::domain::{DeployConfig, FatalError, SoftError};
use siteup_cli::infra::fs::LocalFs;

use crate::helpers::{
    FakePackages, FakeServices, FakeWeb, NoopReporter, Privileged, RecordingReporter, Sandbox,
    list_files,
};

struct World {
    packages: FakePackages,
    services: FakeServices,
    web: FakeWeb,
    privilege: Privileged,
}

impl World {
    /// Server installed and running, operator is root.
    fn ready() -> Self {
        Self {
            packages: FakePackages::ok(),
            services: FakeServices::new(true),
            web: FakeWeb::new(true),
            privilege: Privileged(true),
        }
    }

    /// Fresh host: nothing installed, nothing running.
    fn bare() -> Self {
        Self {
            packages: FakePackages::ok(),
            services: FakeServices::new(false),
            web: FakeWeb::new(false),
            privilege: Privileged(true),
        }
    }

    fn host(&self) -> Host<'_, FakePackages, FakeServices, FakeWeb, LocalFs, Privileged> {
        Host {
            packages: &self.packages,
            services: &self.services,
            web: &self.web,
            fs: &LocalFs,
            privilege: &self.privilege,
        }
    }

    async fn run(
        &self,
        config: &DeployConfig,
        source: &Path,
        name: Option<&str>,
    ) -> Result<ProvisionReport, siteup_cli::application::services::provision::ProvisionError>
    {
        let input = ProvisionInput { source, name };
        provision(&self.host(), config, &input, &NoopReporter).await
    }
}

// ── Happy path ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_provision_ready_host_skips_install_and_start() {
    let sandbox = Sandbox::new();
    let source = sandbox.source_site("site");
    let world = World::ready();

    let report = world
        .run(&sandbox.config, &source, None)
        .await
        .expect("provision");

    assert!(world.packages.calls().is_empty(), "no package calls expected");
    assert_eq!(world.services.mutations(), vec!["restart apache2"]);
    assert!(!report.installed_server);
    assert!(!report.started_server);
    assert!(report.server_before.installed);
    assert!(report.server_before.running);
    assert!(!report.is_degraded(), "{:?}", report.soft_failures);
}

#[tokio::test]
async fn test_provision_bare_host_installs_then_starts() {
    let sandbox = Sandbox::new();
    let source = sandbox.source_site("site");
    let world = World::bare();

    let report = world
        .run(&sandbox.config, &source, None)
        .await
        .expect("provision");

    assert_eq!(world.packages.calls(), vec!["refresh", "install apache2"]);
    assert_eq!(world.services.mutations(), vec!["start apache2", "restart apache2"]);
    assert!(report.installed_server);
    assert!(report.started_server);
}

#[tokio::test]
async fn test_provision_stages_tree_and_writes_artifacts() {
    let sandbox = Sandbox::new();
    let source = sandbox.source_site("site");
    let world = World::ready();

    let report = world
        .run(&sandbox.config, &source, None)
        .await
        .expect("provision");

    let deploy_dir = sandbox.config.serving_root.join("site");
    assert_eq!(report.application_name, "site");
    assert_eq!(report.deploy_dir, deploy_dir);
    assert_eq!(report.files_copied, 2);
    assert_eq!(list_files(&deploy_dir), vec!["css/app.css", "index.html"]);

    let conf = std::fs::read_to_string(&report.site_config_path).expect("read conf");
    assert_eq!(
        report.site_config_path,
        sandbox.config.sites_available_dir.join("site.conf")
    );
    assert!(conf.contains(&format!("DocumentRoot {}\n", deploy_dir.display())));
    assert!(conf.contains("ServerAlias site.local\n"));
    assert_eq!(world.web.enabled(), vec!["site.conf"]);

    assert!(report.alias_registered);
    assert!(sandbox.hosts().contains("127.0.0.1\tsite.local\n"));
    assert_eq!(report.server_alias, "site.local");
    assert_eq!(report.url, "http://site.local/");
}

#[tokio::test]
async fn test_provision_walks_every_state_in_order() {
    let sandbox = Sandbox::new();
    let source = sandbox.source_site("site");
    let world = World::ready();

    let report = world
        .run(&sandbox.config, &source, None)
        .await
        .expect("provision");

    assert_eq!(
        report.transitions,
        vec![
            ProvisionState::Unchecked,
            ProvisionState::PrivilegeVerified,
            ProvisionState::ServerInstalled,
            ProvisionState::ServerRunning,
            ProvisionState::Staged,
            ProvisionState::Configured,
            ProvisionState::Registered,
            ProvisionState::Restarted,
            ProvisionState::Done,
        ]
    );
    assert!(report.transitions.windows(2).all(|w| w[0] < w[1]));
}

#[tokio::test]
async fn test_provision_name_override_drives_every_artifact() {
    let sandbox = Sandbox::new();
    let source = sandbox.source_site("build");
    let world = World::ready();

    let report = world
        .run(&sandbox.config, &source, Some("shop"))
        .await
        .expect("provision");

    assert_eq!(report.application_name, "shop");
    assert_eq!(report.deploy_dir, sandbox.config.serving_root.join("shop"));
    assert!(sandbox.config.sites_available_dir.join("shop.conf").is_file());
    assert!(sandbox.hosts().contains("shop.local"));
    assert!(!sandbox.config.serving_root.join("build").exists());
}

#[tokio::test]
async fn test_provision_single_file_source_lands_inside_deploy_dir() {
    let sandbox = Sandbox::new();
    let source = sandbox.path().join("landing.html");
    std::fs::write(&source, "<p>soon</p>").expect("write");
    let world = World::ready();

    let report = world
        .run(&sandbox.config, &source, Some("landing"))
        .await
        .expect("provision");

    assert_eq!(report.files_copied, 1);
    let copied = report.deploy_dir.join("landing.html");
    assert_eq!(std::fs::read_to_string(copied).expect("read"), "<p>soon</p>");
}

// ── Repeatability ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_provision_twice_is_idempotent() {
    let sandbox = Sandbox::new();
    let source = sandbox.source_site("site");
    let world = World::ready();

    let first = world
        .run(&sandbox.config, &source, None)
        .await
        .expect("first");
    let conf_first = std::fs::read_to_string(&first.site_config_path).expect("read");
    let second = world
        .run(&sandbox.config, &source, None)
        .await
        .expect("second");
    let conf_second = std::fs::read_to_string(&second.site_config_path).expect("read");

    assert_eq!(conf_first, conf_second);
    assert_eq!(list_files(&second.deploy_dir), vec!["css/app.css", "index.html"]);
    assert!(first.alias_registered);
    assert!(!second.alias_registered);
    assert_eq!(sandbox.hosts().matches("site.local").count(), 1);
}

#[tokio::test]
async fn test_provision_full_replace_drops_stale_files() {
    let sandbox = Sandbox::new();
    let source = sandbox.source_site("site");
    let world = World::ready();

    std::fs::write(source.join("app.js"), "console.log(1)").expect("write");
    world
        .run(&sandbox.config, &source, None)
        .await
        .expect("first");
    assert!(sandbox.config.serving_root.join("site/app.js").is_file());

    std::fs::remove_file(source.join("app.js")).expect("rm");
    let report = world
        .run(&sandbox.config, &source, None)
        .await
        .expect("second");

    assert_eq!(list_files(&report.deploy_dir), vec!["css/app.css", "index.html"]);
}

// ── Fatal halts ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_provision_without_privilege_touches_nothing() {
    let sandbox = Sandbox::new();
    let source = sandbox.source_site("site");
    let world = World {
        privilege: Privileged(false),
        ..World::bare()
    };

    let err = world
        .run(&sandbox.config, &source, None)
        .await
        .expect_err("must fail");

    assert!(matches!(err.error, FatalError::InsufficientPrivilege));
    assert_eq!(err.state, ProvisionState::Unchecked);
    assert!(world.packages.calls().is_empty());
    assert!(world.services.calls().is_empty());
    assert!(!sandbox.config.serving_root.exists());
    assert_eq!(sandbox.hosts(), "127.0.0.1\tlocalhost\n");
}

#[tokio::test]
async fn test_provision_missing_source_halts_before_mutation() {
    let sandbox = Sandbox::new();
    let world = World::bare();
    let missing = sandbox.path().join("nope");

    let err = world
        .run(&sandbox.config, &missing, None)
        .await
        .expect_err("must fail");

    assert!(matches!(err.error, FatalError::SourceNotFound(ref p) if *p == missing));
    assert_eq!(err.state, ProvisionState::PrivilegeVerified);
    assert!(world.packages.calls().is_empty());
    assert!(world.services.mutations().is_empty());
    assert!(!sandbox.config.serving_root.exists());
    assert_eq!(sandbox.hosts(), "127.0.0.1\tlocalhost\n");
}

#[tokio::test]
async fn test_provision_source_inside_serving_root_is_refused_intact() {
    let sandbox = Sandbox::new();
    let source = sandbox.source_site("site");
    // deploy_dir resolves to the source itself
    let config = DeployConfig {
        serving_root: sandbox.path().join("src"),
        ..sandbox.config.clone()
    };
    let world = World::bare();

    let err = world
        .run(&config, &source, None)
        .await
        .expect_err("must fail");

    assert!(matches!(err.error, FatalError::StageOverlap { .. }), "got {err:?}");
    assert_eq!(err.state, ProvisionState::PrivilegeVerified);
    assert!(world.packages.calls().is_empty(), "nothing installed");
    assert!(world.services.mutations().is_empty());
    assert_eq!(list_files(&source), vec!["css/app.css", "index.html"]);
    assert_eq!(sandbox.hosts(), "127.0.0.1\tlocalhost\n");
}

#[tokio::test]
async fn test_provision_invalid_name_is_fatal() {
    let sandbox = Sandbox::new();
    let source = sandbox.source_site("site");
    let world = World::ready();

    let err = world
        .run(&sandbox.config, &source, Some("bad name"))
        .await
        .expect_err("must fail");

    assert!(matches!(err.error, FatalError::InvalidApplicationName(_)));
    assert!(!sandbox.config.serving_root.exists());
}

#[tokio::test]
async fn test_provision_install_failure_is_fatal() {
    let sandbox = Sandbox::new();
    let source = sandbox.source_site("site");
    let world = World {
        packages: FakePackages {
            install_ok: false,
            ..FakePackages::ok()
        },
        ..World::bare()
    };

    let err = world
        .run(&sandbox.config, &source, None)
        .await
        .expect_err("must fail");

    assert!(matches!(err.error, FatalError::InstallError(_)));
    assert_eq!(err.state, ProvisionState::PrivilegeVerified);
    assert!(world.services.mutations().is_empty(), "start must not be attempted");
    assert!(!sandbox.config.serving_root.exists());
}

#[tokio::test]
async fn test_provision_start_failure_is_fatal() {
    let sandbox = Sandbox::new();
    let source = sandbox.source_site("site");
    let world = World {
        services: FakeServices {
            start_ok: false,
            ..FakeServices::new(false)
        },
        ..World::ready()
    };

    let err = world
        .run(&sandbox.config, &source, None)
        .await
        .expect_err("must fail");

    assert!(matches!(err.error, FatalError::StartError(_)));
    assert_eq!(err.state, ProvisionState::ServerInstalled);
    assert!(!sandbox.config.serving_root.exists());
}

// ── Soft continues ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_provision_restart_failure_is_soft() {
    let sandbox = Sandbox::new();
    let source = sandbox.source_site("site");
    let world = World {
        services: FakeServices {
            restart_ok: false,
            ..FakeServices::new(true)
        },
        ..World::ready()
    };
    let reporter = RecordingReporter::default();
    let input = ProvisionInput {
        source: &source,
        name: None,
    };

    let report = provision(&world.host(), &sandbox.config, &input, &reporter)
        .await
        .expect("restart failure must not halt");

    assert_eq!(report.soft_failures.len(), 1);
    let failure = &report.soft_failures[0];
    assert_eq!(failure.state, ProvisionState::Restarted);
    assert!(matches!(failure.error, SoftError::Restart(_)));
    assert_eq!(reporter.warnings().len(), 1);
    assert_eq!(report.transitions.last(), Some(&ProvisionState::Done));
    assert!(report.deploy_dir.join("index.html").is_file());
}

#[tokio::test]
async fn test_provision_site_enable_failure_is_soft() {
    let sandbox = Sandbox::new();
    let source = sandbox.source_site("site");
    let world = World {
        web: FakeWeb {
            enable_ok: false,
            ..FakeWeb::new(true)
        },
        ..World::ready()
    };

    let report = world
        .run(&sandbox.config, &source, None)
        .await
        .expect("config failure must not halt");

    assert_eq!(report.soft_failures.len(), 1);
    assert!(matches!(report.soft_failures[0].error, SoftError::Config(_)));
    assert_eq!(report.soft_failures[0].state, ProvisionState::Configured);
    assert!(report.alias_registered, "later steps still run");
    assert_eq!(world.services.mutations(), vec!["restart apache2"]);
}

#[tokio::test]
async fn test_provision_unwritable_sites_dir_is_soft() {
    let sandbox = Sandbox::new();
    let source = sandbox.source_site("site");
    let config = DeployConfig {
        sites_available_dir: sandbox.path().join("missing/sites-available"),
        ..sandbox.config.clone()
    };
    let world = World::ready();

    let report = world
        .run(&config, &source, None)
        .await
        .expect("config failure must not halt");

    assert!(matches!(report.soft_failures[0].error, SoftError::Config(_)));
    assert!(world.web.enabled().is_empty(), "nothing to enable");
    assert!(report.deploy_dir.join("index.html").is_file());
}

#[tokio::test]
async fn test_provision_unknown_service_user_is_soft() {
    let sandbox = Sandbox::new();
    let source = sandbox.source_site("site");
    let config = DeployConfig {
        service_user: "siteup-no-such-user".to_owned(),
        ..sandbox.config.clone()
    };
    let world = World::ready();

    let report = world
        .run(&config, &source, None)
        .await
        .expect("ownership failure must not halt");

    assert_eq!(report.soft_failures.len(), 1);
    assert!(matches!(
        report.soft_failures[0].error,
        SoftError::PermissionApply(_)
    ));
    assert_eq!(report.soft_failures[0].state, ProvisionState::Staged);
    assert!(report.deploy_dir.join("css/app.css").is_file());
}

#[tokio::test]
async fn test_provision_missing_hosts_file_is_created() {
    let sandbox = Sandbox::new();
    let source = sandbox.source_site("site");
    std::fs::remove_file(&sandbox.config.hosts_file).expect("rm hosts");
    let world = World::ready();

    let report = world
        .run(&sandbox.config, &source, None)
        .await
        .expect("provision");

    assert!(report.alias_registered);
    assert_eq!(sandbox.hosts(), "127.0.0.1\tsite.local\n");
}
