#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProblemCategory {
    Network,
    Hardware,
    Software,
    Printer,
    AirConditioning,
    Electricity,
    Other,
}

impl ProblemCategory {
    pub const ALL: [ProblemCategory; 7] = [
        ProblemCategory::Network,
        ProblemCategory::Hardware,
        ProblemCategory::Software,
        ProblemCategory::Printer,
        ProblemCategory::AirConditioning,
        ProblemCategory::Electricity,
        ProblemCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProblemCategory::Network => "NETWORK",
            ProblemCategory::Hardware => "HARDWARE",
            ProblemCategory::Software => "SOFTWARE",
            ProblemCategory::Printer => "PRINTER",
            ProblemCategory::AirConditioning => "AIR_CONDITIONING",
            ProblemCategory::Electricity => "ELECTRICITY",
            ProblemCategory::Other => "OTHER",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        let normalized = value.trim().to_uppercase().replace(['-', ' '], "_");
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == normalized)
    }

    pub fn subcategories(&self) -> &'static [&'static str] {
        match self {
            ProblemCategory::Network => &["INTERNET_DOWN", "SLOW_CONNECTION", "WIFI_ISSUE"],
            ProblemCategory::Hardware => &[
                "MONITOR_BROKEN",
                "KEYBOARD_BROKEN",
                "MOUSE_BROKEN",
                "COMPUTER_CRASH",
            ],
            ProblemCategory::Software => &["INSTALLATION", "LICENSE", "PERFORMANCE"],
            ProblemCategory::Printer => &["JAM", "NO_PRINTING", "CARTRIDGE"],
            ProblemCategory::AirConditioning => &["INSTALLATION_AC", "MALFUNCTION_AC"],
            ProblemCategory::Electricity => &["POWER_DOWN", "LIGHT_PROBLEM"],
            ProblemCategory::Other => &["OTHER"],
        }
    }

    /// Returns the canonical subcategory code when it belongs to this category.
    pub fn subcategory(&self, value: &str) -> Option<&'static str> {
        let normalized = value.trim().to_uppercase().replace(['-', ' '], "_");
        self.subcategories()
            .iter()
            .copied()
            .find(|sub| *sub == normalized)
    }

    pub fn default_subcategory(&self) -> &'static str {
        self.subcategories()[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_category_codes() {
        assert_eq!(
            ProblemCategory::from_str("air conditioning"),
            Some(ProblemCategory::AirConditioning)
        );
        assert_eq!(
            ProblemCategory::from_str("printer"),
            Some(ProblemCategory::Printer)
        );
        assert_eq!(ProblemCategory::from_str("plumbing"), None);
    }

    #[test]
    fn subcategory_must_belong_to_category() {
        assert_eq!(
            ProblemCategory::Printer.subcategory("no-printing"),
            Some("NO_PRINTING")
        );
        assert_eq!(ProblemCategory::Printer.subcategory("WIFI_ISSUE"), None);
        assert_eq!(
            ProblemCategory::Hardware.default_subcategory(),
            "MONITOR_BROKEN"
        );
    }
}
