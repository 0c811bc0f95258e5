use serde::Serialize;

/// Counts whole seconds of watching and reveals the call-to-action once the
/// configured threshold is reached. Visibility only ever goes false -> true.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CtaGate {
    threshold_secs: Option<u32>,
    elapsed_secs: u64,
    visible: bool,
}

impl CtaGate {
    pub fn new(threshold_secs: Option<u32>) -> Self {
        Self {
            threshold_secs,
            elapsed_secs: 0,
            visible: false,
        }
    }

    /// Adds one second. Returns true only on the tick that revealed the CTA.
    pub fn tick(&mut self) -> bool {
        self.elapsed_secs = self.elapsed_secs.saturating_add(1);
        self.evaluate()
    }

    /// Re-checks the threshold without advancing. Returns true only when this
    /// call revealed the CTA.
    pub fn evaluate(&mut self) -> bool {
        if self.visible {
            return false;
        }
        match self.threshold_secs {
            Some(threshold) if self.elapsed_secs >= u64::from(threshold) => {
                self.visible = true;
                true
            }
            _ => false,
        }
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn threshold_secs(&self) -> Option<u32> {
        self.threshold_secs
    }
}
