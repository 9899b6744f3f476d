// Per-domain alert threshold profiles: shipped defaults plus config overrides.
// One named field per domain, so a domain without a profile cannot be represented.

use serde::{Deserialize, Serialize};

use crate::models::NetworkDomain;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdProfile {
    /// Peak utilization (%) raising a warning.
    pub utilization_warning: f64,
    /// Peak utilization (%) raising a critical alert.
    pub utilization_critical: f64,
    /// Down interface count raising a warning.
    pub interface_down_warning: u32,
    pub interface_down_critical: u32,
    /// Down equipment count; carried for dashboards, not evaluated by the alert engine.
    pub equipment_down_warning: u32,
    pub equipment_down_critical: u32,
}

impl ThresholdProfile {
    const fn new(util: (f64, f64), if_down: (u32, u32), eq_down: (u32, u32)) -> Self {
        Self {
            utilization_warning: util.0,
            utilization_critical: util.1,
            interface_down_warning: if_down.0,
            interface_down_critical: if_down.1,
            equipment_down_warning: eq_down.0,
            equipment_down_critical: eq_down.1,
        }
    }

    fn apply(&mut self, o: &ThresholdOverride) {
        if let Some(v) = o.utilization_warning {
            self.utilization_warning = v;
        }
        if let Some(v) = o.utilization_critical {
            self.utilization_critical = v;
        }
        if let Some(v) = o.interface_down_warning {
            self.interface_down_warning = v;
        }
        if let Some(v) = o.interface_down_critical {
            self.interface_down_critical = v;
        }
        if let Some(v) = o.equipment_down_warning {
            self.equipment_down_warning = v;
        }
        if let Some(v) = o.equipment_down_critical {
            self.equipment_down_critical = v;
        }
    }

    fn validate(&self, domain: NetworkDomain) -> anyhow::Result<()> {
        for (name, v) in [
            ("utilization_warning", self.utilization_warning),
            ("utilization_critical", self.utilization_critical),
        ] {
            anyhow::ensure!(
                v.is_finite() && (0.0..=100.0).contains(&v),
                "thresholds.{}: {} must be within 0..=100, got {}",
                domain,
                name,
                v
            );
        }
        anyhow::ensure!(
            self.utilization_warning <= self.utilization_critical,
            "thresholds.{}: utilization_warning ({}) must not exceed utilization_critical ({})",
            domain,
            self.utilization_warning,
            self.utilization_critical
        );
        anyhow::ensure!(
            self.interface_down_warning > 0
                && self.interface_down_warning <= self.interface_down_critical,
            "thresholds.{}: interface_down_warning must be > 0 and <= interface_down_critical, got {}/{}",
            domain,
            self.interface_down_warning,
            self.interface_down_critical
        );
        anyhow::ensure!(
            self.equipment_down_warning > 0
                && self.equipment_down_warning <= self.equipment_down_critical,
            "thresholds.{}: equipment_down_warning must be > 0 and <= equipment_down_critical, got {}/{}",
            domain,
            self.equipment_down_warning,
            self.equipment_down_critical
        );
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdProfiles {
    pub lan: ThresholdProfile,
    pub backbone: ThresholdProfile,
    pub datacenter: ThresholdProfile,
    pub fabric_ip: ThresholdProfile,
    pub core_internet: ThresholdProfile,
}

impl Default for ThresholdProfiles {
    fn default() -> Self {
        Self {
            lan: ThresholdProfile::new((80.0, 95.0), (10, 20), (5, 10)),
            backbone: ThresholdProfile::new((65.0, 80.0), (2, 5), (1, 2)),
            datacenter: ThresholdProfile::new((70.0, 85.0), (5, 10), (2, 5)),
            fabric_ip: ThresholdProfile::new((70.0, 85.0), (3, 8), (1, 3)),
            core_internet: ThresholdProfile::new((60.0, 75.0), (1, 3), (1, 2)),
        }
    }
}

impl ThresholdProfiles {
    pub fn get(&self, domain: NetworkDomain) -> &ThresholdProfile {
        match domain {
            NetworkDomain::Lan => &self.lan,
            NetworkDomain::Backbone => &self.backbone,
            NetworkDomain::Datacenter => &self.datacenter,
            NetworkDomain::FabricIp => &self.fabric_ip,
            NetworkDomain::CoreInternet => &self.core_internet,
        }
    }

    fn get_mut(&mut self, domain: NetworkDomain) -> &mut ThresholdProfile {
        match domain {
            NetworkDomain::Lan => &mut self.lan,
            NetworkDomain::Backbone => &mut self.backbone,
            NetworkDomain::Datacenter => &mut self.datacenter,
            NetworkDomain::FabricIp => &mut self.fabric_ip,
            NetworkDomain::CoreInternet => &mut self.core_internet,
        }
    }

    /// Applies only the fields present in `overrides`; everything else keeps its current value.
    pub fn with_overrides(mut self, overrides: &ThresholdOverrides) -> Self {
        for domain in NetworkDomain::ALL {
            if let Some(o) = overrides.get(domain) {
                self.get_mut(domain).apply(o);
            }
        }
        self
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        for domain in NetworkDomain::ALL {
            self.get(domain).validate(domain)?;
        }
        Ok(())
    }
}

/// `[thresholds.<domain>]` table from the config file; every field optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThresholdOverride {
    pub utilization_warning: Option<f64>,
    pub utilization_critical: Option<f64>,
    pub interface_down_warning: Option<u32>,
    pub interface_down_critical: Option<u32>,
    pub equipment_down_warning: Option<u32>,
    pub equipment_down_critical: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThresholdOverrides {
    pub lan: Option<ThresholdOverride>,
    pub backbone: Option<ThresholdOverride>,
    pub datacenter: Option<ThresholdOverride>,
    pub fabric_ip: Option<ThresholdOverride>,
    pub core_internet: Option<ThresholdOverride>,
}

impl ThresholdOverrides {
    fn get(&self, domain: NetworkDomain) -> Option<&ThresholdOverride> {
        match domain {
            NetworkDomain::Lan => self.lan.as_ref(),
            NetworkDomain::Backbone => self.backbone.as_ref(),
            NetworkDomain::Datacenter => self.datacenter.as_ref(),
            NetworkDomain::FabricIp => self.fabric_ip.as_ref(),
            NetworkDomain::CoreInternet => self.core_internet.as_ref(),
        }
    }
}
