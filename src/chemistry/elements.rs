/// Element symbols indexed by atomic number minus one.
pub const ELEMENT_SYMBOLS: [&str; 118] = [
    "H", "He",
    "Li", "Be", "B", "C", "N", "O", "F", "Ne",
    "Na", "Mg", "Al", "Si", "P", "S", "Cl", "Ar",
    "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn",
    "Ga", "Ge", "As", "Se", "Br", "Kr",
    "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd",
    "In", "Sn", "Sb", "Te", "I", "Xe",
    "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb", "Dy",
    "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt",
    "Au", "Hg", "Tl", "Pb", "Bi", "Po", "At", "Rn",
    "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk", "Cf",
    "Es", "Fm", "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds",
    "Rg", "Cn", "Nh", "Fl", "Mc", "Lv", "Ts", "Og",
];

pub fn atomic_number(symbol: &str) -> Option<usize> {
    ELEMENT_SYMBOLS.iter().position(|&s| s == symbol).map(|i| i + 1)
}

pub fn symbol_of(atomic_number: usize) -> Option<&'static str> {
    atomic_number
        .checked_sub(1)
        .and_then(|i| ELEMENT_SYMBOLS.get(i))
        .copied()
}

/// Van der Waals radius in Å.
/// Data Source: Alvarez, S. (2013). Dalton Trans., 42, 8617-8636.
pub fn vdw_radius(element: &str) -> Option<f64> {
    let r = match element {
        // Period 1
        "H" => 1.20, "He" => 1.40,
        // Period 2
        "Li" => 1.82, "Be" => 1.53, "B" => 1.92, "C" => 1.70,
        "N" => 1.55, "O" => 1.52, "F" => 1.47, "Ne" => 1.54,
        // Period 3
        "Na" => 2.27, "Mg" => 1.73, "Al" => 1.84, "Si" => 2.10,
        "P" => 1.80, "S" => 1.80, "Cl" => 1.75, "Ar" => 1.88,
        // Period 4
        "K" => 2.75, "Ca" => 2.31, "Sc" => 2.11, "Ti" => 2.00, "V" => 2.00, "Cr" => 2.00,
        "Mn" => 2.00, "Fe" => 2.00, "Co" => 2.00, "Ni" => 1.63, "Cu" => 1.40, "Zn" => 1.39,
        "Ga" => 1.87, "Ge" => 2.11, "As" => 1.85, "Se" => 1.90, "Br" => 1.85, "Kr" => 2.02,
        // Period 5
        "Rb" => 3.03, "Sr" => 2.49, "Pd" => 1.63, "Ag" => 1.72, "Cd" => 1.58,
        "In" => 1.93, "Sn" => 2.17, "Sb" => 2.06, "Te" => 2.06, "I" => 1.98, "Xe" => 2.16,
        // Period 6
        "Cs" => 3.43, "Ba" => 2.68, "Pt" => 1.75, "Au" => 1.66, "Hg" => 1.55,
        "Tl" => 1.96, "Pb" => 2.02, "Bi" => 2.07, "Po" => 1.97, "At" => 2.02, "Rn" => 2.20,
        // Period 7
        "Fr" => 3.48, "Ra" => 2.83, "U" => 1.86,
        _ => return None,
    };
    Some(r)
}

/// Covalent radius in Å (H through Cm).
/// Data Source: Cordero, B. et al. (2008). Dalton Trans., 2832-2838.
pub fn covalent_radius(element: &str) -> Option<f64> {
    const COVALENT: [f64; 96] = [
        0.31, 0.28,
        1.28, 0.96, 0.84, 0.76, 0.71, 0.66, 0.57, 0.58,
        1.66, 1.41, 1.21, 1.11, 1.07, 1.05, 1.02, 1.06,
        2.03, 1.76, 1.70, 1.60, 1.53, 1.39, 1.39, 1.32, 1.26, 1.24, 1.32, 1.22,
        1.22, 1.20, 1.19, 1.20, 1.20, 1.16,
        2.20, 1.95, 1.90, 1.75, 1.64, 1.54, 1.47, 1.46, 1.42, 1.39, 1.45, 1.44,
        1.42, 1.39, 1.39, 1.38, 1.39, 1.40,
        2.44, 2.15, 2.07, 2.04, 2.03, 2.01, 1.99, 1.98, 1.98, 1.96, 1.94, 1.92,
        1.92, 1.89, 1.90, 1.87, 1.87, 1.75, 1.70, 1.62, 1.51, 1.44, 1.41, 1.36,
        1.36, 1.32, 1.45, 1.46, 1.48, 1.40, 1.50, 1.50,
        2.60, 2.21, 2.15, 2.06, 2.00, 1.96, 1.90, 1.87, 1.80, 1.69,
    ];
    atomic_number(element).and_then(|z| COVALENT.get(z - 1)).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_lookup() {
        assert_eq!(atomic_number("H"), Some(1));
        assert_eq!(atomic_number("Fe"), Some(26));
        assert_eq!(atomic_number("Og"), Some(118));
        assert_eq!(atomic_number("Xx"), None);
        assert_eq!(symbol_of(82), Some("Pb"));
        assert_eq!(symbol_of(0), None);
    }

    #[test]
    fn radius_tables_cover_expected_ranges() {
        assert_eq!(covalent_radius("C"), Some(0.76));
        assert_eq!(covalent_radius("Cm"), Some(1.69));
        assert_eq!(covalent_radius("Bk"), None);
        assert_eq!(vdw_radius("O"), Some(1.52));
        assert_eq!(vdw_radius("Og"), None);
    }
}
