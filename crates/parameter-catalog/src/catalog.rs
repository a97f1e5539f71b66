//! Parameter Catalog
//!
//! Registry of every parameter the engine knows how to classify. The
//! built-in table covers a three-phase 50 Hz diesel generator set with a
//! 24 V starting system.

use crate::spec::{Band, Category, ParameterSpec};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

struct Entry {
    key: &'static str,
    name: &'static str,
    unit: &'static str,
    category: Category,
    description: &'static str,
    normal: Band,
    warning: Band,
    critical: Band,
    emergency: Band,
}

const BUILTIN: &[Entry] = &[
    Entry {
        key: "oilPressure",
        name: "Oil Pressure",
        unit: "PSI",
        category: Category::Engine,
        description: "Engine lubrication oil pressure - critical for bearing protection",
        normal: Band::new(30.0, 65.0),
        warning: Band::new(15.0, 75.0),
        critical: Band::new(10.0, 85.0),
        emergency: Band::unbounded(),
    },
    Entry {
        key: "oilTemperature",
        name: "Oil Temperature",
        unit: "°C",
        category: Category::Engine,
        description: "Engine oil temperature - affects viscosity and lubrication efficiency",
        normal: Band::new(70.0, 100.0),
        warning: Band::new(50.0, 110.0),
        critical: Band::new(30.0, 120.0),
        emergency: Band::at_most(130.0),
    },
    Entry {
        key: "coolantTemp",
        name: "Coolant Temperature",
        unit: "°C",
        category: Category::Cooling,
        description: "Engine cooling water temperature",
        normal: Band::new(75.0, 95.0),
        warning: Band::new(60.0, 100.0),
        critical: Band::new(40.0, 110.0),
        emergency: Band::at_most(120.0),
    },
    Entry {
        key: "rpm",
        name: "Engine Speed",
        unit: "RPM",
        category: Category::Engine,
        description: "Engine rotational speed - affects frequency output",
        normal: Band::new(1480.0, 1520.0),
        warning: Band::new(1450.0, 1550.0),
        critical: Band::new(1400.0, 1600.0),
        emergency: Band::at_most(1700.0),
    },
    Entry {
        key: "frequency",
        name: "Output Frequency",
        unit: "Hz",
        category: Category::Electrical,
        description: "Generator output frequency - critical for connected equipment",
        normal: Band::new(49.5, 50.5),
        warning: Band::new(49.0, 51.0),
        critical: Band::new(47.0, 53.0),
        emergency: Band::new(45.0, 55.0),
    },
    Entry {
        key: "voltageL1N",
        name: "Voltage L1-N",
        unit: "V AC",
        category: Category::Electrical,
        description: "Phase L1 to neutral voltage",
        normal: Band::new(220.0, 240.0),
        warning: Band::new(210.0, 250.0),
        critical: Band::new(200.0, 260.0),
        emergency: Band::new(190.0, 270.0),
    },
    Entry {
        key: "voltageL2N",
        name: "Voltage L2-N",
        unit: "V AC",
        category: Category::Electrical,
        description: "Phase L2 to neutral voltage",
        normal: Band::new(220.0, 240.0),
        warning: Band::new(210.0, 250.0),
        critical: Band::new(200.0, 260.0),
        emergency: Band::unbounded(),
    },
    Entry {
        key: "voltageL3N",
        name: "Voltage L3-N",
        unit: "V AC",
        category: Category::Electrical,
        description: "Phase L3 to neutral voltage",
        normal: Band::new(220.0, 240.0),
        warning: Band::new(210.0, 250.0),
        critical: Band::new(200.0, 260.0),
        emergency: Band::unbounded(),
    },
    Entry {
        key: "voltageL1L2",
        name: "Voltage L1-L2",
        unit: "V AC",
        category: Category::Electrical,
        description: "Line to line voltage L1-L2",
        normal: Band::new(380.0, 420.0),
        warning: Band::new(370.0, 430.0),
        critical: Band::new(360.0, 440.0),
        emergency: Band::unbounded(),
    },
    Entry {
        key: "voltageL2L3",
        name: "Voltage L2-L3",
        unit: "V AC",
        category: Category::Electrical,
        description: "Line to line voltage L2-L3",
        normal: Band::new(380.0, 420.0),
        warning: Band::new(370.0, 430.0),
        critical: Band::new(360.0, 440.0),
        emergency: Band::unbounded(),
    },
    Entry {
        key: "voltageL3L1",
        name: "Voltage L3-L1",
        unit: "V AC",
        category: Category::Electrical,
        description: "Line to line voltage L3-L1",
        normal: Band::new(380.0, 420.0),
        warning: Band::new(370.0, 430.0),
        critical: Band::new(360.0, 440.0),
        emergency: Band::unbounded(),
    },
    Entry {
        key: "currentL1",
        name: "Current L1",
        unit: "A",
        category: Category::Electrical,
        description: "Phase L1 current",
        normal: Band::new(0.0, 500.0),
        warning: Band::new(0.0, 550.0),
        critical: Band::new(0.0, 600.0),
        emergency: Band::unbounded(),
    },
    Entry {
        key: "currentL2",
        name: "Current L2",
        unit: "A",
        category: Category::Electrical,
        description: "Phase L2 current",
        normal: Band::new(0.0, 500.0),
        warning: Band::new(0.0, 550.0),
        critical: Band::new(0.0, 600.0),
        emergency: Band::unbounded(),
    },
    Entry {
        key: "currentL3",
        name: "Current L3",
        unit: "A",
        category: Category::Electrical,
        description: "Phase L3 current",
        normal: Band::new(0.0, 500.0),
        warning: Band::new(0.0, 550.0),
        critical: Band::new(0.0, 600.0),
        emergency: Band::unbounded(),
    },
    Entry {
        key: "loadPercent",
        name: "Load Percentage",
        unit: "%",
        category: Category::Load,
        description: "Generator load as percentage of rated capacity",
        normal: Band::new(30.0, 80.0),
        warning: Band::new(10.0, 90.0),
        critical: Band::new(5.0, 100.0),
        emergency: Band::at_most(110.0),
    },
    Entry {
        key: "powerFactor",
        name: "Power Factor",
        unit: "",
        category: Category::Electrical,
        description: "Ratio of real power to apparent power",
        normal: Band::new(0.85, 1.0),
        warning: Band::new(0.75, 1.0),
        critical: Band::new(0.65, 1.0),
        emergency: Band::unbounded(),
    },
    Entry {
        key: "batteryVoltage",
        name: "Battery Voltage",
        unit: "V DC",
        category: Category::Battery,
        description: "Starting battery voltage (24V system)",
        normal: Band::new(24.0, 28.0),
        warning: Band::new(22.0, 30.0),
        critical: Band::new(20.0, 32.0),
        emergency: Band::at_least(18.0),
    },
    Entry {
        key: "fuelLevel",
        name: "Fuel Level",
        unit: "%",
        category: Category::Fuel,
        description: "Fuel tank level percentage",
        normal: Band::new(30.0, 100.0),
        warning: Band::new(20.0, 100.0),
        critical: Band::new(10.0, 100.0),
        emergency: Band::at_least(5.0),
    },
    Entry {
        key: "fuelPressure",
        name: "Fuel Pressure",
        unit: "bar",
        category: Category::Fuel,
        description: "Fuel supply pressure to injectors",
        normal: Band::new(2.5, 4.0),
        warning: Band::new(2.0, 4.5),
        critical: Band::new(1.5, 5.0),
        emergency: Band::unbounded(),
    },
    Entry {
        key: "exhaustTemp",
        name: "Exhaust Temperature",
        unit: "°C",
        category: Category::Engine,
        description: "Exhaust gas temperature",
        normal: Band::new(350.0, 550.0),
        warning: Band::new(300.0, 600.0),
        critical: Band::new(250.0, 650.0),
        emergency: Band::at_most(700.0),
    },
    Entry {
        key: "turboBoostPressure",
        name: "Turbo Boost Pressure",
        unit: "bar",
        category: Category::Engine,
        description: "Turbocharger boost pressure",
        normal: Band::new(1.0, 2.5),
        warning: Band::new(0.8, 2.8),
        critical: Band::new(0.5, 3.0),
        emergency: Band::unbounded(),
    },
    Entry {
        key: "intakeAirTemp",
        name: "Intake Air Temperature",
        unit: "°C",
        category: Category::Engine,
        description: "Air temperature entering the engine",
        normal: Band::new(20.0, 50.0),
        warning: Band::new(10.0, 55.0),
        critical: Band::new(0.0, 65.0),
        emergency: Band::unbounded(),
    },
];

impl Entry {
    fn to_spec(&self) -> ParameterSpec {
        ParameterSpec {
            key: self.key.to_string(),
            name: self.name.to_string(),
            unit: self.unit.to_string(),
            category: self.category,
            description: self.description.to_string(),
            normal: self.normal,
            warning: self.warning,
            critical: self.critical,
            emergency: self.emergency,
        }
    }
}

/// Immutable registry of parameter specifications
#[derive(Debug, Clone)]
pub struct ParameterCatalog {
    /// Specs in registration order
    specs: Vec<ParameterSpec>,
    /// Key to position in `specs`
    index: HashMap<String, usize>,
}

impl ParameterCatalog {
    /// Catalog with the built-in generator parameters
    pub fn builtin() -> Self {
        Self::from_specs(BUILTIN.iter().map(Entry::to_spec).collect())
    }

    /// Build a catalog from arbitrary specs. The first registration of a key wins.
    pub fn from_specs(specs: Vec<ParameterSpec>) -> Self {
        let mut kept = Vec::with_capacity(specs.len());
        let mut index = HashMap::with_capacity(specs.len());

        for spec in specs {
            if index.contains_key(&spec.key) {
                warn!("Duplicate parameter spec ignored: {}", spec.key);
                continue;
            }
            index.insert(spec.key.clone(), kept.len());
            kept.push(spec);
        }

        debug!("Parameter catalog ready with {} specs", kept.len());
        Self { specs: kept, index }
    }

    /// Look up a spec by key. Unknown keys are simply absent.
    pub fn get(&self, key: &str) -> Option<&ParameterSpec> {
        self.index.get(key).map(|&i| &self.specs[i])
    }

    /// Whether a key is registered
    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// All specs in registration order
    pub fn all(&self) -> impl Iterator<Item = &ParameterSpec> {
        self.specs.iter()
    }

    /// Specs grouped by category, each group in registration order
    pub fn by_category(&self) -> BTreeMap<Category, Vec<&ParameterSpec>> {
        let mut groups: BTreeMap<Category, Vec<&ParameterSpec>> = BTreeMap::new();
        for spec in &self.specs {
            groups.entry(spec.category).or_default().push(spec);
        }
        groups
    }

    /// Number of registered parameters
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl Default for ParameterCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::Status;

    #[test]
    fn test_builtin_lookup() {
        let catalog = ParameterCatalog::builtin();
        let spec = catalog.get("oilPressure").unwrap();
        assert_eq!(spec.name, "Oil Pressure");
        assert_eq!(spec.unit, "PSI");
        assert!(catalog.get("engineHours").is_none());
        assert_eq!(catalog.len(), 22);
    }

    #[test]
    fn test_builtin_bands_are_nested() {
        let catalog = ParameterCatalog::builtin();
        for spec in catalog.all() {
            let (n, w, c) = (spec.normal, spec.warning, spec.critical);
            assert!(w.min <= n.min && n.max <= w.max, "{} warning band", spec.key);
            assert!(c.min <= w.min && w.max <= c.max, "{} critical band", spec.key);
        }
    }

    #[test]
    fn test_oil_pressure_thresholds() {
        let catalog = ParameterCatalog::builtin();
        let spec = catalog.get("oilPressure").unwrap();
        assert_eq!(spec.status_of(5.0), Status::Critical);
        assert_eq!(spec.status_of(12.0), Status::Warning);
        assert_eq!(spec.status_of(40.0), Status::Normal);
    }

    #[test]
    fn test_coolant_thresholds() {
        let catalog = ParameterCatalog::builtin();
        let spec = catalog.get("coolantTemp").unwrap();
        assert_eq!(spec.status_of(115.0), Status::Critical);
        assert_eq!(spec.status_of(125.0), Status::Emergency);
        assert_eq!(spec.status_of(98.0), Status::Warning);
    }

    #[test]
    fn test_group_by_category() {
        let catalog = ParameterCatalog::builtin();
        let groups = catalog.by_category();
        let total: usize = groups.values().map(Vec::len).sum();
        assert_eq!(total, catalog.len());
        assert_eq!(groups[&Category::Battery][0].key, "batteryVoltage");
        assert_eq!(groups[&Category::Cooling].len(), 1);
    }

    #[test]
    fn test_duplicate_keys_keep_first() {
        let mut first = BUILTIN[0].to_spec();
        first.name = "First".to_string();
        let mut second = BUILTIN[0].to_spec();
        second.name = "Second".to_string();

        let catalog = ParameterCatalog::from_specs(vec![first, second]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("oilPressure").unwrap().name, "First");
    }
}
