// ABOUTME: Scripted stand-in for the docker and podman executables.
// ABOUTME: Keeps an in-memory engine state and records every invocation.

use async_trait::async_trait;
use parking_lot::Mutex;
use projenv::runtime::{
    CommandError, CommandOutput, CommandRunner, FullRuntime, Invocation, RuntimeType, connect,
};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

const DAEMON_DOWN: &str =
    "Cannot connect to the Docker daemon at unix:///var/run/docker.sock. Is the docker daemon running?";

#[derive(Debug, Default)]
struct EngineState {
    networks: BTreeSet<String>,
    images: BTreeSet<String>,
    /// Container name -> running.
    containers: BTreeMap<String, bool>,
    invocations: Vec<Invocation>,
    fail_build: bool,
    run_failures: BTreeMap<String, String>,
    /// Network probes say absent but create reports a conflict.
    network_race: bool,
    daemon_down: bool,
    next_id: u32,
}

/// In-memory engine that answers like the real CLI.
pub struct FakeEngine {
    engine: RuntimeType,
    state: Mutex<EngineState>,
}

impl FakeEngine {
    pub fn new(engine: RuntimeType) -> Arc<Self> {
        Arc::new(Self {
            engine,
            state: Mutex::new(EngineState::default()),
        })
    }

    pub fn docker() -> Arc<Self> {
        Self::new(RuntimeType::Docker)
    }

    pub fn podman() -> Arc<Self> {
        Self::new(RuntimeType::Podman)
    }

    /// The adapter for this engine, issuing commands to `self`.
    pub fn runtime(self: &Arc<Self>) -> Box<dyn FullRuntime> {
        connect(self.engine, self.clone())
    }

    pub fn add_network(&self, name: &str) {
        self.state.lock().networks.insert(name.to_string());
    }

    pub fn add_image(&self, reference: &str) {
        self.state.lock().images.insert(reference.to_string());
    }

    pub fn add_container(&self, name: &str, running: bool) {
        self.state.lock().containers.insert(name.to_string(), running);
    }

    pub fn fail_builds(&self) {
        self.state.lock().fail_build = true;
    }

    pub fn fail_run(&self, name: &str, stderr: &str) {
        self.state
            .lock()
            .run_failures
            .insert(name.to_string(), stderr.to_string());
    }

    pub fn simulate_network_race(&self) {
        self.state.lock().network_race = true;
    }

    pub fn stop_daemon(&self) {
        self.state.lock().daemon_down = true;
    }

    pub fn has_network(&self, name: &str) -> bool {
        self.state.lock().networks.contains(name)
    }

    pub fn has_image(&self, reference: &str) -> bool {
        self.state.lock().images.contains(reference)
    }

    pub fn has_container(&self, name: &str) -> bool {
        self.state.lock().containers.contains_key(name)
    }

    pub fn is_running(&self, name: &str) -> bool {
        self.state
            .lock()
            .containers
            .get(name)
            .copied()
            .unwrap_or(false)
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.state.lock().invocations.clone()
    }

    pub fn clear_invocations(&self) {
        self.state.lock().invocations.clear();
    }

    /// Invocations that create something: network create, build, run.
    pub fn creations(&self) -> Vec<Invocation> {
        self.invocations()
            .into_iter()
            .filter(|inv| {
                matches!(
                    inv.args.iter().map(String::as_str).collect::<Vec<_>>().as_slice(),
                    ["network", "create", ..] | ["build", ..] | ["run", ..]
                )
            })
            .collect()
    }

    /// The `run` invocation that started container `name`.
    pub fn run_of(&self, name: &str) -> Option<Invocation> {
        self.invocations().into_iter().find(|inv| {
            inv.args.first().map(String::as_str) == Some("run")
                && inv.args.windows(2).any(|w| w[0] == "--name" && w[1] == name)
        })
    }

    /// Whether any invocation mentions `needle` in one of its arguments.
    pub fn mentions(&self, needle: &str) -> bool {
        self.invocations()
            .iter()
            .any(|inv| inv.args.iter().any(|arg| arg.contains(needle)))
    }

    fn answer(&self, invocation: &Invocation) -> CommandOutput {
        let mut state = self.state.lock();
        state.invocations.push(invocation.clone());

        if state.daemon_down {
            return exit(1, "", DAEMON_DOWN);
        }

        let args: Vec<&str> = invocation.args.iter().map(String::as_str).collect();
        match args.as_slice() {
            ["network", "inspect", name] | ["network", "exists", name] => {
                probe(state.networks.contains(*name) && !state.network_race, name)
            }
            ["network", "create", .., name] => {
                if state.networks.contains(*name) || state.network_race {
                    state.networks.insert(name.to_string());
                    return exit(125, "", &format!("network with name {name} already exists"));
                }
                state.networks.insert(name.to_string());
                exit(0, &format!("{name}-id\n"), "")
            }
            ["image", "inspect", reference] | ["image", "exists", reference] => {
                probe(state.images.contains(*reference), reference)
            }
            ["container", "inspect", name] | ["container", "exists", name] => {
                probe(state.containers.contains_key(*name), name)
            }
            ["ps", "--filter", filter, ..] => {
                let name = filter.trim_start_matches("name=^").trim_end_matches('$');
                if state.containers.get(name).copied().unwrap_or(false) {
                    exit(0, &format!("{name}\n"), "")
                } else {
                    exit(0, "", "")
                }
            }
            ["build", "-t", tag, ..] => {
                if state.fail_build {
                    return exit(1, "", "");
                }
                state.images.insert(tag.to_string());
                exit(0, "", "")
            }
            ["run", "-d", "--name", name, ..] => {
                if state.containers.contains_key(*name) {
                    return exit(
                        125,
                        "",
                        &format!(
                            "docker: Error response from daemon: Conflict. The container name \"/{name}\" is already in use."
                        ),
                    );
                }
                if let Some(stderr) = state.run_failures.get(*name) {
                    return exit(125, "", stderr);
                }
                state.next_id += 1;
                let id = format!("{:064x}", state.next_id);
                state.containers.insert(name.to_string(), true);
                exit(0, &format!("{id}\n"), "")
            }
            ["stop", name] => match state.containers.get_mut(*name) {
                Some(running) => {
                    *running = false;
                    exit(0, &format!("{name}\n"), "")
                }
                None => missing_container(name),
            },
            ["rm", name] => match state.containers.remove(*name) {
                Some(_) => exit(0, &format!("{name}\n"), ""),
                None => missing_container(name),
            },
            _ => exit(127, "", &format!("unsupported: {}", invocation.display())),
        }
    }
}

#[async_trait]
impl CommandRunner for FakeEngine {
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput, CommandError> {
        Ok(self.answer(invocation))
    }
}

fn exit(code: i32, stdout: &str, stderr: &str) -> CommandOutput {
    CommandOutput {
        exit_code: Some(code),
        stdout: stdout.to_string(),
        stderr: stderr.to_string(),
    }
}

fn probe(present: bool, name: &str) -> CommandOutput {
    if present {
        exit(0, "[{}]\n", "")
    } else {
        exit(1, "[]\n", &format!("Error: No such object: {name}"))
    }
}

fn missing_container(name: &str) -> CommandOutput {
    exit(
        1,
        "",
        &format!("Error response from daemon: No such container: {name}"),
    )
}
