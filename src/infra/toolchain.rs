//! Host probes
//!
//! Facts about the machine that option resolution depends on: CPU count,
//! executables on `PATH` and the invoking user.

/// Source of host facts
pub trait Host {
    /// Logical CPUs available to this process
    fn logical_cpus(&self) -> usize;

    /// Whether `name` resolves to an executable on `PATH`
    fn has_executable(&self, name: &str) -> bool;

    /// Login name of the invoking user
    fn current_user(&self) -> Option<String>;
}

/// The machine we are running on
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemHost;

impl Host for SystemHost {
    fn logical_cpus(&self) -> usize {
        num_cpus::get()
    }

    fn has_executable(&self, name: &str) -> bool {
        which::which(name).is_ok()
    }

    fn current_user(&self) -> Option<String> {
        std::env::var("USER").ok().filter(|user| !user.is_empty())
    }
}

/// Host with fixed answers, for tests
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct FakeHost {
    cpus: usize,
    executables: Vec<String>,
    user: Option<String>,
}

#[cfg(test)]
impl FakeHost {
    pub fn new(cpus: usize) -> Self {
        Self {
            cpus,
            executables: Vec::new(),
            user: Some("builder".to_string()),
        }
    }

    pub fn with_executables(mut self, names: &[&str]) -> Self {
        self.executables = names.iter().map(ToString::to_string).collect();
        self
    }

    pub fn without_user(mut self) -> Self {
        self.user = None;
        self
    }
}

#[cfg(test)]
impl Host for FakeHost {
    fn logical_cpus(&self) -> usize {
        self.cpus
    }

    fn has_executable(&self, name: &str) -> bool {
        self.executables.iter().any(|e| e == name)
    }

    fn current_user(&self) -> Option<String> {
        self.user.clone()
    }
}
