//! Bridge process management
//!
//! Spawns the Node.js bridge with piped stdin/stdout and hands the pipe
//! ends to the dispatcher and the line reader. The handle stays with the
//! session controller for lifecycle operations (liveness check, kill).

use crate::error::{Result, TransportError};
use std::process::Stdio;
use tokio::process::{Child, ChildStdin, ChildStdout, Command};

/// Configuration for spawning the bridge process
#[derive(Clone, Debug)]
pub struct BridgeConfig {
    /// Runtime executable (normally `node`)
    pub program: String,

    /// Path to the bridge script
    pub script: String,

    /// Game server host
    pub host: String,

    /// Game server port
    pub port: u16,

    /// Agent username
    pub username: String,

    /// Password, if the server requires one
    pub password: Option<String>,

    /// Auth provider (e.g. `microsoft`)
    pub auth: Option<String>,

    /// Protocol version override; autodetected when absent
    pub version: Option<String>,

    /// Run the bridge in local simulation mode, no real server needed
    pub mock: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            program: "node".to_string(),
            script: "bot.js".to_string(),
            host: "127.0.0.1".to_string(),
            port: 25565,
            username: "Bot".to_string(),
            password: None,
            auth: None,
            version: None,
            mock: false,
        }
    }
}

impl BridgeConfig {
    /// Create a configuration for the given server address
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Set the agent username
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    /// Set the server password
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Set the auth provider
    pub fn with_auth(mut self, auth: impl Into<String>) -> Self {
        self.auth = Some(auth.into());
        self
    }

    /// Pin the protocol version
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Enable local simulation mode
    pub fn with_mock(mut self, mock: bool) -> Self {
        self.mock = mock;
        self
    }

    /// Render the child argv (everything after the program name)
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            self.script.clone(),
            "--host".to_string(),
            self.host.clone(),
            "--port".to_string(),
            self.port.to_string(),
            "--username".to_string(),
            self.username.clone(),
        ];
        if let Some(password) = &self.password {
            args.push("--password".to_string());
            args.push(password.clone());
        }
        if let Some(auth) = &self.auth {
            args.push("--auth".to_string());
            args.push(auth.clone());
        }
        if let Some(version) = &self.version {
            args.push("--version".to_string());
            args.push(version.clone());
        }
        if self.mock {
            args.push("--mock".to_string());
        }
        args
    }
}

/// Handle to the running bridge process
///
/// Stdin and stdout are taken out exactly once, by the dispatcher and the
/// line reader respectively; the handle itself keeps lifecycle control.
pub struct BridgeProcess {
    child: Child,
    stdin: Option<ChildStdin>,
    stdout: Option<ChildStdout>,
}

impl BridgeProcess {
    /// Spawn the bridge process
    ///
    /// Stdin and stdout are piped for the NDJSON protocol; stderr is
    /// inherited so bridge diagnostics reach the operator's terminal
    /// directly. The child is killed on drop, so no bridge outlives the
    /// driver.
    pub fn spawn(config: &BridgeConfig) -> Result<Self> {
        let mut cmd = Command::new(&config.program);
        cmd.args(config.to_args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        tracing::debug!(program = %config.program, script = %config.script, "spawning bridge");
        let mut child = cmd.spawn().map_err(|source| TransportError::Spawn {
            program: config.program.clone(),
            source,
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| TransportError::Stream("bridge stdin was not piped".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| TransportError::Stream("bridge stdout was not piped".to_string()))?;

        Ok(Self {
            child,
            stdin: Some(stdin),
            stdout: Some(stdout),
        })
    }

    /// Take the child's stdin for the command dispatcher
    pub fn take_stdin(&mut self) -> Result<ChildStdin> {
        self.stdin
            .take()
            .ok_or_else(|| TransportError::Stream("bridge stdin already taken".to_string()))
    }

    /// Take the child's stdout for the line reader
    pub fn take_stdout(&mut self) -> Result<ChildStdout> {
        self.stdout
            .take()
            .ok_or_else(|| TransportError::Stream("bridge stdout already taken".to_string()))
    }

    /// Check whether the bridge is still running
    pub fn is_alive(&mut self) -> bool {
        self.child.try_wait().ok().flatten().is_none()
    }

    /// Terminate the bridge
    ///
    /// Idempotent: killing an already-exited child is not an error.
    pub async fn kill(&mut self) {
        if let Err(err) = self.child.kill().await {
            tracing::debug!(%err, "bridge kill after exit");
        }
    }

    /// OS process id, if the child has not been reaped yet
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }
}
