//! In-process model of liblxc.
//!
//! Follows the native state machine and configuration semantics closely
//! enough to exercise the handle without root, cgroups, or templates:
//!
//! - containers are shared by name through a registry, like on-disk
//!   definitions are shared between liblxc objects;
//! - transitions outside the state machine are rejected;
//! - `start` returns once the simulated init is running, whatever the
//!   daemonize flag says;
//! - configuration is held in memory and only touches the filesystem
//!   through `load_config`/`save_config`.

use std::collections::HashMap;
use std::ffi::CStr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::Instant;

use lxcbind_common::constants::container_config_path;
use lxcbind_common::types::{LifecycleState, Timeout};

use super::{NativeContainer, NativeLibrary};
use crate::marshal::NativeArgv;

/// Templates the simulation knows how to "run".
pub const TEMPLATES: &[&str] = &["download", "busybox", "ubuntu", "debian", "alpine"];

/// Version string reported by the simulation.
pub const SIMULATED_VERSION: &str = "simulated-4.0";

const FIRST_PID: i32 = 4000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Multiplicity {
    Single,
    Multi,
}

/// Keys accepted by the simulated configuration.
const KEYS: &[(&str, Multiplicity)] = &[
    ("lxc.arch", Multiplicity::Single),
    ("lxc.utsname", Multiplicity::Single),
    ("lxc.rootfs", Multiplicity::Single),
    ("lxc.rootfs.mount", Multiplicity::Single),
    ("lxc.tty", Multiplicity::Single),
    ("lxc.pts", Multiplicity::Single),
    ("lxc.console", Multiplicity::Single),
    ("lxc.mount", Multiplicity::Single),
    ("lxc.mount.entry", Multiplicity::Multi),
    ("lxc.mount.auto", Multiplicity::Multi),
    ("lxc.cap.drop", Multiplicity::Multi),
    ("lxc.cap.keep", Multiplicity::Multi),
    ("lxc.hook.pre-start", Multiplicity::Multi),
    ("lxc.hook.post-stop", Multiplicity::Multi),
    ("lxc.include", Multiplicity::Multi),
    ("lxc.start.auto", Multiplicity::Single),
    ("lxc.start.delay", Multiplicity::Single),
    ("lxc.network.type", Multiplicity::Single),
    ("lxc.network.link", Multiplicity::Single),
    ("lxc.network.flags", Multiplicity::Single),
    ("lxc.network.hwaddr", Multiplicity::Single),
    ("lxc.network.ipv4", Multiplicity::Multi),
];

/// Families whose children are arbitrary single-valued keys.
const KEY_FAMILIES: &[&str] = &["lxc.cgroup."];

fn multiplicity(key: &str) -> Option<Multiplicity> {
    if let Some((_, m)) = KEYS.iter().find(|(k, _)| *k == key) {
        return Some(*m);
    }
    KEY_FAMILIES
        .iter()
        .any(|family| key.len() > family.len() && key.starts_with(family))
        .then_some(Multiplicity::Single)
}

/// Returns whether `key` names a key or a group of keys.
fn is_known_prefix(key: &str) -> bool {
    let dotted = format!("{key}.");
    KEYS.iter().any(|(k, _)| k.starts_with(&dotted))
        || KEY_FAMILIES.iter().any(|family| *family == dotted)
}

#[derive(Debug)]
struct Record {
    defined: bool,
    state: LifecycleState,
    init_pid: i32,
    config: Vec<(String, String)>,
}

impl Record {
    const fn new() -> Self {
        Self {
            defined: false,
            state: LifecycleState::Stopped,
            init_pid: -1,
            config: Vec::new(),
        }
    }

    fn values(&self, key: &str) -> Vec<&str> {
        self.config
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    fn set(&mut self, key: &str, value: &str) -> bool {
        match multiplicity(key) {
            None => false,
            Some(Multiplicity::Multi) if value.is_empty() => {
                self.config.retain(|(k, _)| k != key);
                true
            }
            Some(Multiplicity::Multi) => {
                self.config.push((key.to_string(), value.to_string()));
                true
            }
            Some(Multiplicity::Single) => {
                if let Some(entry) = self.config.iter_mut().find(|(k, _)| k == key) {
                    entry.1 = value.to_string();
                } else {
                    self.config.push((key.to_string(), value.to_string()));
                }
                true
            }
        }
    }

    fn clear(&mut self, key: &str) -> bool {
        if multiplicity(key).is_none() && !is_known_prefix(key) {
            return false;
        }
        let dotted = format!("{key}.");
        self.config
            .retain(|(k, _)| k != key && !k.starts_with(&dotted));
        true
    }

    /// Whether the record is indistinguishable from one never touched.
    fn is_pristine(&self) -> bool {
        !self.defined && self.state == LifecycleState::Stopped && self.config.is_empty()
    }

    fn render(&self) -> String {
        self.config
            .iter()
            .map(|(k, v)| format!("{k} = {v}\n"))
            .collect()
    }
}

/// Parses `key = value` lines, skipping blanks and `#` comments.
fn parse_config(content: &str) -> Option<Vec<(String, String)>> {
    let mut entries = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (key, value) = line.split_once('=')?;
        let key = key.trim();
        if multiplicity(key).is_none() {
            return None;
        }
        entries.push((key.to_string(), value.trim().to_string()));
    }
    Some(entries)
}

#[derive(Debug, Default)]
struct Registry {
    containers: Mutex<HashMap<String, Record>>,
    changed: Condvar,
}

impl Registry {
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Record>> {
        self.containers
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// Simulated liblxc rooted at one lxcpath.
#[derive(Debug, Clone)]
pub struct SimulatedLibrary {
    lxc_path: PathBuf,
    registry: Arc<Registry>,
    next_pid: Arc<AtomicI32>,
}

impl SimulatedLibrary {
    /// Creates an empty simulation whose default lxcpath is `lxc_path`.
    #[must_use]
    pub fn new(lxc_path: PathBuf) -> Self {
        Self {
            lxc_path,
            registry: Arc::new(Registry::default()),
            next_pid: Arc::new(AtomicI32::new(FIRST_PID)),
        }
    }

    /// Number of containers currently defined.
    #[must_use]
    pub fn defined_count(&self) -> usize {
        self.registry.lock().values().filter(|r| r.defined).count()
    }
}

impl NativeLibrary for SimulatedLibrary {
    fn new_container(
        &self,
        name: &CStr,
        config_path: Option<&CStr>,
    ) -> Option<Box<dyn NativeContainer>> {
        let name = name.to_str().ok()?;
        if name.is_empty() || name.contains('/') {
            tracing::debug!(name, "simulated allocation refused");
            return None;
        }
        let lxc_path = match config_path {
            Some(path) => PathBuf::from(path.to_str().ok()?),
            None => self.lxc_path.clone(),
        };
        Some(Box::new(SimulatedContainer {
            name: name.to_string(),
            config_file: container_config_path(&lxc_path, name),
            daemonize: false,
            registry: Arc::clone(&self.registry),
            next_pid: Arc::clone(&self.next_pid),
        }))
    }

    fn version(&self) -> Option<String> {
        Some(SIMULATED_VERSION.to_string())
    }

    fn default_lxc_path(&self) -> Option<String> {
        Some(self.lxc_path.to_string_lossy().into_owned())
    }

    fn describe(&self) -> &str {
        "simulated"
    }
}

struct SimulatedContainer {
    name: String,
    config_file: PathBuf,
    daemonize: bool,
    registry: Arc<Registry>,
    next_pid: Arc<AtomicI32>,
}

impl SimulatedContainer {
    fn read<R>(&self, f: impl FnOnce(&Record) -> R) -> R {
        let containers = self.registry.lock();
        match containers.get(&self.name) {
            Some(record) => f(record),
            None => f(&Record::new()),
        }
    }

    /// Applies `f` to the record and wakes waiters if it reports success.
    /// Records are created on first write and dropped once pristine again.
    fn update(&self, f: impl FnOnce(&mut Record) -> bool) -> bool {
        let ok = {
            let mut containers = self.registry.lock();
            let record = containers
                .entry(self.name.clone())
                .or_insert_with(Record::new);
            let ok = f(record);
            if record.is_pristine() {
                let _ = containers.remove(&self.name);
            }
            ok
        };
        if ok {
            self.registry.changed.notify_all();
        }
        ok
    }

    /// Walks `from -> via -> to`, publishing the intermediate state.
    fn transition(
        &self,
        from: &[LifecycleState],
        via: LifecycleState,
        to: LifecycleState,
    ) -> bool {
        let entered = self.update(|r| {
            if !r.defined || !from.contains(&r.state) {
                return false;
            }
            r.state = via;
            true
        });
        if !entered {
            return false;
        }
        tracing::trace!(name = %self.name, state = %via, "simulated transition");
        self.update(|r| {
            r.state = to;
            if !to.is_active() {
                r.init_pid = -1;
            }
            true
        })
    }

    fn path_or_default(&self, path: Option<&CStr>) -> Option<PathBuf> {
        match path {
            Some(p) => p.to_str().ok().map(PathBuf::from),
            None => Some(self.config_file.clone()),
        }
    }
}

impl NativeContainer for SimulatedContainer {
    fn is_defined(&self) -> bool {
        self.read(|r| r.defined)
    }

    fn is_running(&self) -> bool {
        self.read(|r| r.state.is_active())
    }

    fn state(&self) -> Option<String> {
        Some(self.read(|r| r.state).as_str().to_string())
    }

    fn init_pid(&self) -> i32 {
        self.read(|r| r.init_pid)
    }

    fn is_daemonized(&self) -> bool {
        self.daemonize
    }

    fn want_daemonize(&mut self, state: bool) -> bool {
        self.daemonize = state;
        true
    }

    fn freeze(&mut self) -> bool {
        self.transition(
            &[LifecycleState::Running],
            LifecycleState::Freezing,
            LifecycleState::Frozen,
        )
    }

    fn unfreeze(&mut self) -> bool {
        self.transition(
            &[LifecycleState::Frozen],
            LifecycleState::Thawed,
            LifecycleState::Running,
        )
    }

    fn create(&mut self, template: &CStr, argv: Option<&NativeArgv>) -> bool {
        let Ok(template) = template.to_str() else {
            return false;
        };
        if !TEMPLATES.contains(&template) {
            tracing::debug!(template, "unknown simulated template");
            return false;
        }
        let args: Vec<String> = argv
            .map(|a| a.iter().map(|s| s.to_string_lossy().into_owned()).collect())
            .unwrap_or_default();
        let rootfs = self
            .config_file
            .with_file_name("rootfs")
            .to_string_lossy()
            .into_owned();
        let name = self.name.clone();
        self.update(|r| {
            if r.defined {
                return false;
            }
            r.defined = true;
            r.state = LifecycleState::Stopped;
            r.config.clear();
            let _ = r.set("lxc.utsname", &name);
            let _ = r.set("lxc.rootfs", &rootfs);
            if let Some(arch) = option_value(&args, &["-a", "--arch"]) {
                let _ = r.set("lxc.arch", arch);
            }
            true
        })
    }

    fn start(&mut self, _use_init: bool, _argv: Option<&NativeArgv>) -> bool {
        let pid = self.next_pid.fetch_add(1, Ordering::Relaxed);
        let entered = self.update(|r| {
            if !r.defined || r.state != LifecycleState::Stopped {
                return false;
            }
            r.state = LifecycleState::Starting;
            r.init_pid = pid;
            true
        });
        entered
            && self.update(|r| {
                r.state = LifecycleState::Running;
                true
            })
    }

    fn stop(&mut self) -> bool {
        self.transition(
            &[
                LifecycleState::Starting,
                LifecycleState::Running,
                LifecycleState::Frozen,
                LifecycleState::Thawed,
            ],
            LifecycleState::Stopping,
            LifecycleState::Stopped,
        )
    }

    fn shutdown(&mut self, timeout: i32) -> bool {
        // A frozen init cannot react to the shutdown signal; only another
        // handle stopping the container ends the wait early.
        if self.read(|r| r.state) == LifecycleState::Frozen {
            return self.wait(c"STOPPED", timeout);
        }
        self.transition(
            &[LifecycleState::Running],
            LifecycleState::Stopping,
            LifecycleState::Stopped,
        )
    }

    fn destroy(&mut self) -> bool {
        self.update(|r| {
            if !r.defined || r.state.is_active() {
                return false;
            }
            *r = Record::new();
            true
        })
    }

    fn wait(&self, state: &CStr, timeout: i32) -> bool {
        let target = LifecycleState::from_native(&state.to_string_lossy());
        if target == LifecycleState::Invalid || target == LifecycleState::MaxState {
            return false;
        }
        let deadline = Timeout::from_native(timeout)
            .as_duration()
            .map(|d| Instant::now() + d);

        let mut containers = self.registry.lock();
        loop {
            if containers
                .get(&self.name)
                .is_some_and(|r| r.state == target)
            {
                return true;
            }
            match deadline {
                None => {
                    containers = self
                        .registry
                        .changed
                        .wait(containers)
                        .unwrap_or_else(std::sync::PoisonError::into_inner);
                }
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return false;
                    }
                    containers = self
                        .registry
                        .changed
                        .wait_timeout(containers, deadline - now)
                        .unwrap_or_else(std::sync::PoisonError::into_inner)
                        .0;
                }
            }
        }
    }

    fn config_file_name(&self) -> Option<String> {
        Some(self.config_file.to_string_lossy().into_owned())
    }

    fn get_config_item(&self, key: &CStr) -> Option<String> {
        let key = key.to_str().ok()?;
        if multiplicity(key).is_none() {
            return None;
        }
        Some(self.read(|r| r.values(key).join("\n")))
    }

    fn set_config_item(&mut self, key: &CStr, value: &CStr) -> bool {
        let (Ok(key), Ok(value)) = (key.to_str(), value.to_str()) else {
            return false;
        };
        self.update(|r| r.set(key, value))
    }

    fn clear_config_item(&mut self, key: &CStr) -> bool {
        let Ok(key) = key.to_str() else {
            return false;
        };
        self.update(|r| r.clear(key))
    }

    fn get_keys(&self, key: &CStr) -> Option<String> {
        let key = key.to_str().ok()?;
        if key.is_empty() {
            let all: Vec<&str> = KEYS.iter().map(|(k, _)| *k).collect();
            return Some(all.join("\n"));
        }
        let dotted = format!("{key}.");
        let mut subkeys: Vec<String> = KEYS
            .iter()
            .filter_map(|(k, _)| k.strip_prefix(&dotted))
            .map(str::to_string)
            .collect();
        self.read(|r| {
            for (k, _) in &r.config {
                if let Some(sub) = k.strip_prefix(&dotted) {
                    if !subkeys.iter().any(|s| s == sub) {
                        subkeys.push(sub.to_string());
                    }
                }
            }
        });
        if subkeys.is_empty() && !is_known_prefix(key) {
            return None;
        }
        Some(subkeys.join("\n"))
    }

    fn load_config(&mut self, path: Option<&CStr>) -> bool {
        let Some(path) = self.path_or_default(path) else {
            return false;
        };
        let Some(entries) = std::fs::read_to_string(&path)
            .ok()
            .and_then(|content| parse_config(&content))
        else {
            tracing::debug!(path = %path.display(), "simulated load_config failed");
            return false;
        };
        self.update(|r| {
            r.config = entries;
            true
        })
    }

    fn save_config(&mut self, path: Option<&CStr>) -> bool {
        let Some(path) = self.path_or_default(path) else {
            return false;
        };
        let is_default = path == self.config_file;
        let content = self.read(Record::render);
        if !write_config(&path, &content) {
            return false;
        }
        if is_default {
            let _ = self.update(|r| {
                r.defined = true;
                true
            });
        }
        true
    }
}

fn write_config(path: &Path, content: &str) -> bool {
    if let Some(parent) = path.parent() {
        if std::fs::create_dir_all(parent).is_err() {
            return false;
        }
    }
    std::fs::write(path, content).is_ok()
}

/// Finds the value following any of `flags` in a template argument list.
fn option_value<'a>(args: &'a [String], flags: &[&str]) -> Option<&'a str> {
    args.windows(2)
        .find(|pair| flags.contains(&pair[0].as_str()))
        .map(|pair| pair[1].as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn container(lib: &SimulatedLibrary, name: &CStr) -> Box<dyn NativeContainer> {
        lib.new_container(name, None).unwrap()
    }

    #[test]
    fn empty_or_slashed_names_are_not_allocated() {
        let lib = SimulatedLibrary::new(PathBuf::from("/tmp/lxc"));
        assert!(lib.new_container(c"", None).is_none());
        assert!(lib.new_container(c"a/b", None).is_none());
    }

    #[test]
    fn objects_with_the_same_name_share_state() {
        let lib = SimulatedLibrary::new(PathBuf::from("/tmp/lxc"));
        let mut a = container(&lib, c"shared");
        let b = container(&lib, c"shared");
        assert!(a.create(c"busybox", None));
        assert!(b.is_defined());
        assert_eq!(lib.defined_count(), 1);
    }

    #[test]
    fn single_keys_overwrite_and_multi_keys_append() {
        let lib = SimulatedLibrary::new(PathBuf::from("/tmp/lxc"));
        let mut c = container(&lib, c"cfg");
        assert!(c.set_config_item(c"lxc.utsname", c"one"));
        assert!(c.set_config_item(c"lxc.utsname", c"two"));
        assert_eq!(c.get_config_item(c"lxc.utsname").as_deref(), Some("two"));

        assert!(c.set_config_item(c"lxc.cap.drop", c"sys_admin"));
        assert!(c.set_config_item(c"lxc.cap.drop", c"mknod"));
        assert_eq!(
            c.get_config_item(c"lxc.cap.drop").as_deref(),
            Some("sys_admin\nmknod")
        );

        assert!(c.set_config_item(c"lxc.cap.drop", c""));
        assert_eq!(c.get_config_item(c"lxc.cap.drop").as_deref(), Some(""));
    }

    #[test]
    fn unknown_keys_are_native_errors() {
        let lib = SimulatedLibrary::new(PathBuf::from("/tmp/lxc"));
        let mut c = container(&lib, c"cfg");
        assert!(!c.set_config_item(c"lxc.bogus", c"x"));
        assert_eq!(c.get_config_item(c"lxc.bogus"), None);
        assert!(!c.clear_config_item(c"lxc.bogus"));
        assert_eq!(c.get_keys(c"lxc.bogus"), None);
    }

    #[test]
    fn cgroup_family_accepts_any_child_key() {
        let lib = SimulatedLibrary::new(PathBuf::from("/tmp/lxc"));
        let mut c = container(&lib, c"cg");
        assert!(c.set_config_item(c"lxc.cgroup.memory.limit_in_bytes", c"256M"));
        assert!(c.set_config_item(c"lxc.cgroup.cpuset.cpus", c"0-1"));
        assert_eq!(
            c.get_keys(c"lxc.cgroup").as_deref(),
            Some("memory.limit_in_bytes\ncpuset.cpus")
        );
        assert!(c.clear_config_item(c"lxc.cgroup"));
        assert_eq!(c.get_keys(c"lxc.cgroup").as_deref(), Some(""));
    }

    #[test]
    fn network_keys_are_listed_without_prefix() {
        let lib = SimulatedLibrary::new(PathBuf::from("/tmp/lxc"));
        let c = container(&lib, c"net");
        let keys = c.get_keys(c"lxc.network").unwrap();
        assert_eq!(keys, "type\nlink\nflags\nhwaddr\nipv4");
    }

    #[test]
    fn download_template_records_arch() {
        let lib = SimulatedLibrary::new(PathBuf::from("/tmp/lxc"));
        let mut c = container(&lib, c"dl");
        let argv = NativeArgv::new(&["-d", "ubuntu", "-a", "amd64"]).unwrap();
        assert!(c.create(c"download", Some(&argv)));
        assert_eq!(c.get_config_item(c"lxc.arch").as_deref(), Some("amd64"));
        assert_eq!(c.get_config_item(c"lxc.utsname").as_deref(), Some("dl"));
        assert!(!c.create(c"download", Some(&argv)), "already defined");
    }

    #[test]
    fn unknown_template_fails() {
        let lib = SimulatedLibrary::new(PathBuf::from("/tmp/lxc"));
        let mut c = container(&lib, c"t");
        assert!(!c.create(c"gentoo-from-scratch", None));
        assert!(!c.is_defined());
    }

    #[test]
    fn save_to_default_path_defines_container() {
        let dir = tempfile::tempdir().expect("tempdir");
        let lib = SimulatedLibrary::new(dir.path().to_path_buf());
        let mut c = container(&lib, c"saved");
        assert!(c.set_config_item(c"lxc.utsname", c"saved"));
        assert!(!c.is_defined());
        assert!(c.save_config(None));
        assert!(c.is_defined());
        let written = std::fs::read_to_string(dir.path().join("saved/config")).unwrap();
        assert_eq!(written, "lxc.utsname = saved\n");
    }

    #[test]
    fn load_rejects_unknown_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.conf");
        std::fs::write(&path, "# comment\nlxc.nope = 1\n").unwrap();
        let lib = SimulatedLibrary::new(dir.path().to_path_buf());
        let mut c = container(&lib, c"loader");
        let cpath = std::ffi::CString::new(path.to_str().unwrap()).unwrap();
        assert!(!c.load_config(Some(&cpath)));
    }

    #[test]
    fn shutdown_of_frozen_container_times_out() {
        let lib = SimulatedLibrary::new(PathBuf::from("/tmp/lxc"));
        let mut c = container(&lib, c"frozen");
        assert!(c.create(c"busybox", None));
        assert!(c.start(false, None));
        assert!(c.freeze());
        assert!(!c.shutdown(Timeout::DontWait.as_native()));
        assert_eq!(c.state().as_deref(), Some("FROZEN"));
    }

    #[test]
    fn wait_for_unknown_state_fails_immediately() {
        let lib = SimulatedLibrary::new(PathBuf::from("/tmp/lxc"));
        let c = container(&lib, c"w");
        assert!(!c.wait(c"SLEEPING", Timeout::Forever.as_native()));
        assert!(!c.wait(c"MAX_STATE", Timeout::Forever.as_native()));
    }

    #[test]
    fn forever_shutdown_of_frozen_container_blocks_until_stopped() {
        let lib = SimulatedLibrary::new(PathBuf::from("/tmp/lxc"));
        let mut c = container(&lib, c"iceberg");
        assert!(c.create(c"busybox", None));
        assert!(c.start(false, None));
        assert!(c.freeze());

        let mut other = container(&lib, c"iceberg");
        let stopper = std::thread::spawn(move || {
            std::thread::sleep(std::time::Duration::from_millis(100));
            other.stop()
        });
        let began = Instant::now();
        assert!(c.shutdown(Timeout::Forever.as_native()));
        assert!(began.elapsed() >= std::time::Duration::from_millis(100));
        assert!(stopper.join().unwrap());
        assert_eq!(c.state().as_deref(), Some("STOPPED"));
    }

    #[test]
    fn bounded_shutdown_of_frozen_container_waits_out_the_timeout() {
        let lib = SimulatedLibrary::new(PathBuf::from("/tmp/lxc"));
        let mut c = container(&lib, c"glacier");
        assert!(c.create(c"busybox", None));
        assert!(c.start(false, None));
        assert!(c.freeze());
        let began = Instant::now();
        assert!(!c.shutdown(Timeout::Seconds(1).as_native()));
        assert!(began.elapsed() >= std::time::Duration::from_secs(1));
    }

    #[test]
    fn registry_only_holds_touched_containers() {
        let lib = SimulatedLibrary::new(PathBuf::from("/tmp/lxc"));
        for name in [c"a", c"b", c"c"] {
            let c = container(&lib, name);
            assert!(!c.is_defined());
        }
        assert!(lib.registry.lock().is_empty());

        let mut c = container(&lib, c"kept");
        assert!(!c.freeze());
        assert!(lib.registry.lock().is_empty(), "failed calls leave no record");
        assert!(c.create(c"busybox", None));
        assert_eq!(lib.registry.lock().len(), 1);
        assert!(c.destroy());
        assert!(lib.registry.lock().is_empty());
    }
}
