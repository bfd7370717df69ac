/*
 * Copyright (c) 2024. Govcraft
 *
 * Licensed under either of
 *   * Apache License, Version 2.0 (the "License");
 *     you may not use this file except in compliance with the License.
 *     You may obtain a copy of the License at http://www.apache.org/licenses/LICENSE-2.0
 *   * MIT license: http://opensource.org/licenses/MIT
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the applicable License for the specific language governing permissions and
 * limitations under that License.
 */

use std::fs;
use std::path::Path;

use tandem::prelude::*;
use tempfile::TempDir;

mod setup;

fn write_config(root: &Path, body: &str) {
    let dir = root.join("tandem");
    fs::create_dir_all(&dir).expect("config dir");
    fs::write(dir.join("config.toml"), body).expect("config file");
}

fn point_xdg_at(root: &Path) {
    std::env::set_var("XDG_CONFIG_HOME", root);
    std::env::set_var("XDG_CONFIG_DIRS", root.join("system"));
}

// The scenarios share process-wide environment variables, so they run in one test.
#[test]
fn test_load_from_xdg_locations() {
    setup::initialize_tracing();

    // No file anywhere: defaults.
    let empty = TempDir::new().expect("tempdir");
    point_xdg_at(empty.path());
    assert_eq!(TandemConfig::load(), TandemConfig::default());

    // A partial file overrides only what it names.
    let custom = TempDir::new().expect("tempdir");
    write_config(
        custom.path(),
        r#"
[scheduling]
behavior_interval_ms = 250

[chatter]
marker = "sun"
sample_size = 3
"#,
    );
    point_xdg_at(custom.path());
    let config = TandemConfig::load();
    assert_eq!(config.scheduling.behavior_interval_ms, 250);
    assert_eq!(config.chatter.marker, "sun");
    assert_eq!(config.chatter.sample_size, 3);
    assert_eq!(config.chatter.vocabulary, ChatterConfig::default().vocabulary);
    assert_eq!(config.timeouts, TimeoutConfig::default());

    let runtime = TandemApp::launch();
    assert_eq!(runtime.config(), &config);
    let agent = runtime.new_agent("configured").expect("valid name");
    assert_eq!(agent.behavior_interval(), std::time::Duration::from_millis(250));

    // A malformed file is logged and ignored.
    let broken = TempDir::new().expect("tempdir");
    write_config(broken.path(), "[scheduling\nbehavior_interval_ms = ");
    point_xdg_at(broken.path());
    assert_eq!(TandemConfig::load(), TandemConfig::default());

    std::env::remove_var("XDG_CONFIG_HOME");
    std::env::remove_var("XDG_CONFIG_DIRS");
}

#[test]
fn test_load_from_explicit_path() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("tandem.toml");
    fs::write(&path, "[timeouts]\nagent_shutdown_timeout_ms = 5\n").expect("config file");

    let config = TandemConfig::load_from_path(&path).expect("valid file");
    assert_eq!(config.timeouts.agent_shutdown_timeout_ms, 5);
    assert_eq!(config.agent_shutdown_timeout(), std::time::Duration::from_millis(5));

    let missing = TandemConfig::load_from_path(dir.path().join("absent.toml"));
    assert!(matches!(missing, Err(ConfigError::Io { .. })));
}
