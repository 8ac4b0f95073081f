use nalgebra::Vector3;
use rand::Rng;
use tracing::warn;

// ---------------------------------------------------------------------------
// Goal candidates
// ---------------------------------------------------------------------------

/// One goal candidate. `active` only drives external rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub name: String,
    pub position: Vector3<f64>,
    active: bool,
}

impl Target {
    pub fn new(name: impl Into<String>, position: Vector3<f64>) -> Self {
        Self { name: name.into(), position, active: false }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// Fixed candidate list with at most one current target.
#[derive(Debug, Clone, Default)]
pub struct TargetSet {
    targets: Vec<Target>,
    current: Option<usize>,
}

impl TargetSet {
    pub fn new(targets: Vec<Target>) -> Self {
        Self { targets, current: None }
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Target> {
        self.targets.iter()
    }

    pub fn current(&self) -> Option<&Target> {
        self.current.map(|i| &self.targets[i])
    }

    pub fn active_count(&self) -> usize {
        self.targets.iter().filter(|t| t.active).count()
    }

    /// Forget the current target without touching activation flags.
    pub fn clear_current(&mut self) {
        self.current = None;
    }

    /// Deactivate every candidate, activate one uniformly at random and
    /// make it current. An empty set is a scene configuration gap: logged,
    /// nothing selected.
    pub fn select_random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<&Target> {
        if self.targets.is_empty() {
            warn!("Target list is empty; cannot select a target");
            self.current = None;
            return None;
        }

        for target in &mut self.targets {
            target.active = false;
        }

        let idx = rng.gen_range(0..self.targets.len());
        self.targets[idx].active = true;
        self.current = Some(idx);
        Some(&self.targets[idx])
    }
}
