//! Effective ionic radii keyed by (element, charge, coordination).
//!
//! Data Source: Shannon, R. D. (1976). Acta Cryst. A32, 751-767.
//! Transition-metal entries use the high-spin value where Shannon lists both.

/// `(symbol, charge, coordination, radius in Å)`, in catalog order: elements
/// alphabetically as Shannon tabulates them, charges ascending.
pub const IONIC_RADII: &[(&str, i32, &str, f64)] = &[
    ("Ac", 3, "VI", 1.12),
    ("Ag", 1, "II", 0.67), ("Ag", 1, "IV", 1.00), ("Ag", 1, "IVSQ", 1.02), ("Ag", 1, "V", 1.09),
    ("Ag", 1, "VI", 1.15), ("Ag", 1, "VII", 1.22), ("Ag", 1, "VIII", 1.28), ("Ag", 2, "IVSQ", 0.79),
    ("Ag", 2, "VI", 0.94), ("Ag", 3, "IVSQ", 0.67), ("Ag", 3, "VI", 0.75),
    ("Al", 3, "IV", 0.39), ("Al", 3, "V", 0.48), ("Al", 3, "VI", 0.535),
    ("Am", 2, "VII", 1.21), ("Am", 2, "VIII", 1.26), ("Am", 2, "IX", 1.31), ("Am", 3, "VI", 0.975),
    ("Am", 3, "VIII", 1.09), ("Am", 4, "VI", 0.85), ("Am", 4, "VIII", 0.95),
    ("As", 3, "VI", 0.58), ("As", 5, "IV", 0.335), ("As", 5, "VI", 0.46),
    ("At", 7, "VI", 0.62),
    ("Au", 1, "VI", 1.37), ("Au", 3, "IVSQ", 0.68), ("Au", 3, "VI", 0.85), ("Au", 5, "VI", 0.57),
    ("B", 3, "III", 0.01), ("B", 3, "IV", 0.11), ("B", 3, "VI", 0.27),
    ("Ba", 2, "VI", 1.35), ("Ba", 2, "VII", 1.38), ("Ba", 2, "VIII", 1.42), ("Ba", 2, "IX", 1.47),
    ("Ba", 2, "X", 1.52), ("Ba", 2, "XI", 1.57), ("Ba", 2, "XII", 1.61),
    ("Be", 2, "III", 0.16), ("Be", 2, "IV", 0.27), ("Be", 2, "VI", 0.45),
    ("Bi", 3, "V", 0.96), ("Bi", 3, "VI", 1.03), ("Bi", 3, "VIII", 1.17), ("Bi", 5, "VI", 0.76),
    ("Bk", 3, "VI", 0.96), ("Bk", 4, "VI", 0.83), ("Bk", 4, "VIII", 0.93),
    ("Br", -1, "VI", 1.96), ("Br", 3, "IVSQ", 0.59), ("Br", 5, "IIIPY", 0.31),
    ("Br", 7, "IV", 0.25), ("Br", 7, "VI", 0.39),
    ("C", 4, "III", -0.08), ("C", 4, "IV", 0.15), ("C", 4, "VI", 0.16),
    ("Ca", 2, "VI", 1.00), ("Ca", 2, "VII", 1.06), ("Ca", 2, "VIII", 1.12), ("Ca", 2, "IX", 1.18),
    ("Ca", 2, "X", 1.23), ("Ca", 2, "XII", 1.34),
    ("Cd", 2, "IV", 0.78), ("Cd", 2, "V", 0.87), ("Cd", 2, "VI", 0.95), ("Cd", 2, "VII", 1.03),
    ("Cd", 2, "VIII", 1.10), ("Cd", 2, "XII", 1.31),
    ("Ce", 3, "VI", 1.01), ("Ce", 3, "VII", 1.07), ("Ce", 3, "VIII", 1.143), ("Ce", 3, "IX", 1.196),
    ("Ce", 3, "X", 1.25), ("Ce", 3, "XII", 1.34), ("Ce", 4, "VI", 0.87), ("Ce", 4, "VIII", 0.97),
    ("Ce", 4, "X", 1.07), ("Ce", 4, "XII", 1.14),
    ("Cf", 3, "VI", 0.95), ("Cf", 4, "VI", 0.821), ("Cf", 4, "VIII", 0.92),
    ("Cl", -1, "VI", 1.81), ("Cl", 5, "IIIPY", 0.12), ("Cl", 7, "IV", 0.08), ("Cl", 7, "VI", 0.27),
    ("Cm", 3, "VI", 0.97), ("Cm", 4, "VI", 0.85), ("Cm", 4, "VIII", 0.95),
    ("Co", 2, "IV", 0.58), ("Co", 2, "V", 0.67), ("Co", 2, "VI", 0.745), ("Co", 2, "VIII", 0.90),
    ("Co", 3, "VI", 0.61), ("Co", 4, "IV", 0.40), ("Co", 4, "VI", 0.53),
    ("Cr", 2, "VI", 0.80), ("Cr", 3, "VI", 0.615), ("Cr", 4, "IV", 0.41), ("Cr", 4, "VI", 0.55),
    ("Cr", 5, "IV", 0.345), ("Cr", 5, "VI", 0.49), ("Cr", 5, "VIII", 0.57), ("Cr", 6, "IV", 0.26),
    ("Cr", 6, "VI", 0.44),
    ("Cs", 1, "VI", 1.67), ("Cs", 1, "VIII", 1.74), ("Cs", 1, "IX", 1.78), ("Cs", 1, "X", 1.81),
    ("Cs", 1, "XI", 1.85), ("Cs", 1, "XII", 1.88),
    ("Cu", 1, "II", 0.46), ("Cu", 1, "IV", 0.60), ("Cu", 1, "VI", 0.77), ("Cu", 2, "IV", 0.57),
    ("Cu", 2, "IVSQ", 0.57), ("Cu", 2, "V", 0.65), ("Cu", 2, "VI", 0.73), ("Cu", 3, "VI", 0.54),
    ("Dy", 2, "VI", 1.07), ("Dy", 2, "VII", 1.13), ("Dy", 2, "VIII", 1.19), ("Dy", 3, "VI", 0.912),
    ("Dy", 3, "VII", 0.97), ("Dy", 3, "VIII", 1.027), ("Dy", 3, "IX", 1.083),
    ("Er", 3, "VI", 0.89), ("Er", 3, "VII", 0.945), ("Er", 3, "VIII", 1.004),
    ("Er", 3, "IX", 1.062),
    ("Eu", 2, "VI", 1.17), ("Eu", 2, "VII", 1.20), ("Eu", 2, "VIII", 1.25), ("Eu", 2, "IX", 1.30),
    ("Eu", 2, "X", 1.35), ("Eu", 3, "VI", 0.947), ("Eu", 3, "VII", 1.01), ("Eu", 3, "VIII", 1.066),
    ("Eu", 3, "IX", 1.12),
    ("F", -1, "II", 1.285), ("F", -1, "III", 1.30), ("F", -1, "IV", 1.31), ("F", -1, "VI", 1.33),
    ("F", 7, "VI", 0.08),
    ("Fe", 2, "IV", 0.63), ("Fe", 2, "IVSQ", 0.64), ("Fe", 2, "VI", 0.78), ("Fe", 2, "VIII", 0.92),
    ("Fe", 3, "IV", 0.49), ("Fe", 3, "V", 0.58), ("Fe", 3, "VI", 0.645), ("Fe", 3, "VIII", 0.78),
    ("Fe", 4, "VI", 0.585), ("Fe", 6, "IV", 0.25),
    ("Fr", 1, "VI", 1.80),
    ("Ga", 3, "IV", 0.47), ("Ga", 3, "V", 0.55), ("Ga", 3, "VI", 0.62),
    ("Gd", 3, "VI", 0.938), ("Gd", 3, "VII", 1.00), ("Gd", 3, "VIII", 1.053),
    ("Gd", 3, "IX", 1.107),
    ("Ge", 2, "VI", 0.73), ("Ge", 4, "IV", 0.39), ("Ge", 4, "VI", 0.53),
    ("H", 1, "I", -0.38), ("H", 1, "II", -0.18),
    ("Hf", 4, "IV", 0.58), ("Hf", 4, "VI", 0.71), ("Hf", 4, "VII", 0.76), ("Hf", 4, "VIII", 0.83),
    ("Hg", 1, "III", 0.97), ("Hg", 1, "VI", 1.19), ("Hg", 2, "II", 0.69), ("Hg", 2, "IV", 0.96),
    ("Hg", 2, "VI", 1.02), ("Hg", 2, "VIII", 1.14),
    ("Ho", 3, "VI", 0.901), ("Ho", 3, "VIII", 1.015), ("Ho", 3, "IX", 1.072), ("Ho", 3, "X", 1.12),
    ("I", -1, "VI", 2.20), ("I", 5, "IIIPY", 0.44), ("I", 5, "VI", 0.95), ("I", 7, "IV", 0.42),
    ("I", 7, "VI", 0.53),
    ("In", 3, "IV", 0.62), ("In", 3, "VI", 0.80), ("In", 3, "VIII", 0.92),
    ("Ir", 3, "VI", 0.68), ("Ir", 4, "VI", 0.625), ("Ir", 5, "VI", 0.57),
    ("K", 1, "IV", 1.37), ("K", 1, "VI", 1.38), ("K", 1, "VII", 1.46), ("K", 1, "VIII", 1.51),
    ("K", 1, "IX", 1.55), ("K", 1, "X", 1.59), ("K", 1, "XII", 1.64),
    ("La", 3, "VI", 1.032), ("La", 3, "VII", 1.10), ("La", 3, "VIII", 1.16), ("La", 3, "IX", 1.216),
    ("La", 3, "X", 1.27), ("La", 3, "XII", 1.36),
    ("Li", 1, "IV", 0.59), ("Li", 1, "VI", 0.76), ("Li", 1, "VIII", 0.92),
    ("Lu", 3, "VI", 0.861), ("Lu", 3, "VIII", 0.977), ("Lu", 3, "IX", 1.032),
    ("Mg", 2, "IV", 0.57), ("Mg", 2, "V", 0.66), ("Mg", 2, "VI", 0.72), ("Mg", 2, "VIII", 0.89),
    ("Mn", 2, "IV", 0.66), ("Mn", 2, "V", 0.75), ("Mn", 2, "VI", 0.83), ("Mn", 2, "VII", 0.90),
    ("Mn", 2, "VIII", 0.96), ("Mn", 3, "V", 0.58), ("Mn", 3, "VI", 0.645), ("Mn", 4, "IV", 0.39),
    ("Mn", 4, "VI", 0.53), ("Mn", 5, "IV", 0.33), ("Mn", 6, "IV", 0.255), ("Mn", 7, "IV", 0.25),
    ("Mn", 7, "VI", 0.46),
    ("Mo", 3, "VI", 0.69), ("Mo", 4, "VI", 0.65), ("Mo", 5, "IV", 0.46), ("Mo", 5, "VI", 0.61),
    ("Mo", 6, "IV", 0.41), ("Mo", 6, "V", 0.50), ("Mo", 6, "VI", 0.59), ("Mo", 6, "VII", 0.73),
    ("N", -3, "IV", 1.46), ("N", 3, "VI", 0.16), ("N", 5, "III", -0.104), ("N", 5, "VI", 0.13),
    ("Na", 1, "IV", 0.99), ("Na", 1, "V", 1.00), ("Na", 1, "VI", 1.02), ("Na", 1, "VII", 1.12),
    ("Na", 1, "VIII", 1.18), ("Na", 1, "IX", 1.24), ("Na", 1, "XII", 1.39),
    ("Nb", 3, "VI", 0.72), ("Nb", 4, "VI", 0.68), ("Nb", 4, "VIII", 0.79), ("Nb", 5, "IV", 0.48),
    ("Nb", 5, "VI", 0.64), ("Nb", 5, "VII", 0.69), ("Nb", 5, "VIII", 0.74),
    ("Nd", 2, "VIII", 1.29), ("Nd", 2, "IX", 1.35), ("Nd", 3, "VI", 0.983),
    ("Nd", 3, "VIII", 1.109), ("Nd", 3, "IX", 1.163), ("Nd", 3, "XII", 1.27),
    ("Ni", 2, "IV", 0.55), ("Ni", 2, "IVSQ", 0.49), ("Ni", 2, "V", 0.63), ("Ni", 2, "VI", 0.69),
    ("Ni", 3, "VI", 0.60), ("Ni", 4, "VI", 0.48),
    ("No", 2, "VI", 1.1),
    ("Np", 2, "VI", 1.10), ("Np", 3, "VI", 1.01), ("Np", 4, "VI", 0.87), ("Np", 4, "VIII", 0.98),
    ("Np", 5, "VI", 0.75), ("Np", 6, "VI", 0.72), ("Np", 7, "VI", 0.71),
    ("O", -2, "II", 1.35), ("O", -2, "III", 1.36), ("O", -2, "IV", 1.38), ("O", -2, "VI", 1.40),
    ("O", -2, "VIII", 1.42),
    ("Os", 4, "VI", 0.63), ("Os", 5, "VI", 0.575), ("Os", 6, "V", 0.49), ("Os", 6, "VI", 0.545),
    ("Os", 7, "VI", 0.525), ("Os", 8, "IV", 0.39),
    ("P", 3, "VI", 0.44), ("P", 5, "IV", 0.17), ("P", 5, "V", 0.29), ("P", 5, "VI", 0.38),
    ("Pa", 3, "VI", 1.04), ("Pa", 4, "VI", 0.90), ("Pa", 4, "VIII", 1.01), ("Pa", 5, "VI", 0.78),
    ("Pa", 5, "VIII", 0.91), ("Pa", 5, "IX", 0.95),
    ("Pb", 2, "IVPY", 0.98), ("Pb", 2, "VI", 1.19), ("Pb", 2, "VII", 1.23), ("Pb", 2, "VIII", 1.29),
    ("Pb", 2, "IX", 1.35), ("Pb", 2, "X", 1.40), ("Pb", 2, "XI", 1.45), ("Pb", 2, "XII", 1.49),
    ("Pb", 4, "IV", 0.65), ("Pb", 4, "V", 0.73), ("Pb", 4, "VI", 0.775), ("Pb", 4, "VIII", 0.94),
    ("Pd", 1, "II", 0.59), ("Pd", 2, "IVSQ", 0.64), ("Pd", 2, "VI", 0.86), ("Pd", 3, "VI", 0.76),
    ("Pd", 4, "VI", 0.615),
    ("Pm", 3, "VI", 0.97), ("Pm", 3, "VIII", 1.093), ("Pm", 3, "IX", 1.144),
    ("Po", 4, "VI", 0.94), ("Po", 4, "VIII", 1.08), ("Po", 6, "VI", 0.67),
    ("Pr", 3, "VI", 0.99), ("Pr", 3, "VIII", 1.126), ("Pr", 3, "IX", 1.179), ("Pr", 4, "VI", 0.85),
    ("Pr", 4, "VIII", 0.96),
    ("Pt", 2, "IVSQ", 0.60), ("Pt", 2, "VI", 0.80), ("Pt", 4, "VI", 0.625), ("Pt", 5, "VI", 0.57),
    ("Pu", 3, "VI", 1.00), ("Pu", 4, "VI", 0.86), ("Pu", 4, "VIII", 0.96), ("Pu", 5, "VI", 0.74),
    ("Pu", 6, "VI", 0.71),
    ("Ra", 2, "VIII", 1.48), ("Ra", 2, "XII", 1.70),
    ("Rb", 1, "VI", 1.52), ("Rb", 1, "VII", 1.56), ("Rb", 1, "VIII", 1.61), ("Rb", 1, "IX", 1.63),
    ("Rb", 1, "X", 1.66), ("Rb", 1, "XI", 1.69), ("Rb", 1, "XII", 1.72), ("Rb", 1, "XIV", 1.83),
    ("Re", 4, "VI", 0.63), ("Re", 5, "VI", 0.58), ("Re", 6, "VI", 0.55), ("Re", 7, "IV", 0.38),
    ("Re", 7, "VI", 0.53),
    ("Rh", 3, "VI", 0.665), ("Rh", 4, "VI", 0.60), ("Rh", 5, "VI", 0.55),
    ("Ru", 3, "VI", 0.68), ("Ru", 4, "VI", 0.62), ("Ru", 5, "VI", 0.565), ("Ru", 7, "IV", 0.38),
    ("Ru", 8, "IV", 0.36),
    ("S", -2, "VI", 1.84), ("S", 4, "VI", 0.37), ("S", 6, "IV", 0.12), ("S", 6, "VI", 0.29),
    ("Sb", 3, "IVPY", 0.76), ("Sb", 3, "V", 0.80), ("Sb", 3, "VI", 0.76), ("Sb", 5, "VI", 0.60),
    ("Sc", 3, "VI", 0.745), ("Sc", 3, "VIII", 0.87),
    ("Se", -2, "VI", 1.98), ("Se", 4, "VI", 0.50), ("Se", 6, "IV", 0.28), ("Se", 6, "VI", 0.42),
    ("Si", 4, "IV", 0.26), ("Si", 4, "VI", 0.40),
    ("Sm", 2, "VII", 1.22), ("Sm", 2, "VIII", 1.27), ("Sm", 2, "IX", 1.32), ("Sm", 3, "VI", 0.958),
    ("Sm", 3, "VII", 1.02), ("Sm", 3, "VIII", 1.079), ("Sm", 3, "IX", 1.132),
    ("Sm", 3, "XII", 1.24),
    ("Sn", 4, "IV", 0.55), ("Sn", 4, "V", 0.62), ("Sn", 4, "VI", 0.69), ("Sn", 4, "VII", 0.75),
    ("Sn", 4, "VIII", 0.81),
    ("Sr", 2, "VI", 1.18), ("Sr", 2, "VII", 1.21), ("Sr", 2, "VIII", 1.26), ("Sr", 2, "IX", 1.31),
    ("Sr", 2, "X", 1.36), ("Sr", 2, "XII", 1.44),
    ("Ta", 3, "VI", 0.72), ("Ta", 4, "VI", 0.68), ("Ta", 5, "VI", 0.64), ("Ta", 5, "VII", 0.69),
    ("Ta", 5, "VIII", 0.74),
    ("Tb", 3, "VI", 0.923), ("Tb", 3, "VII", 0.98), ("Tb", 3, "VIII", 1.04), ("Tb", 3, "IX", 1.095),
    ("Tb", 4, "VI", 0.76), ("Tb", 4, "VIII", 0.88),
    ("Tc", 4, "VI", 0.645), ("Tc", 5, "VI", 0.60), ("Tc", 7, "IV", 0.37), ("Tc", 7, "VI", 0.56),
    ("Te", -2, "VI", 2.21), ("Te", 4, "III", 0.52), ("Te", 4, "IV", 0.66), ("Te", 4, "VI", 0.97),
    ("Te", 6, "IV", 0.43), ("Te", 6, "VI", 0.56),
    ("Th", 4, "VI", 0.94), ("Th", 4, "VIII", 1.05), ("Th", 4, "IX", 1.09), ("Th", 4, "X", 1.13),
    ("Th", 4, "XI", 1.18), ("Th", 4, "XII", 1.21),
    ("Ti", 2, "VI", 0.86), ("Ti", 3, "VI", 0.67), ("Ti", 4, "IV", 0.42), ("Ti", 4, "V", 0.51),
    ("Ti", 4, "VI", 0.605), ("Ti", 4, "VIII", 0.74),
    ("Tl", 1, "VI", 1.50), ("Tl", 1, "VIII", 1.59), ("Tl", 1, "XII", 1.70), ("Tl", 3, "IV", 0.75),
    ("Tl", 3, "VI", 0.885), ("Tl", 3, "VIII", 0.98),
    ("Tm", 2, "VI", 1.03), ("Tm", 2, "VII", 1.09), ("Tm", 3, "VI", 0.88), ("Tm", 3, "VIII", 0.994),
    ("Tm", 3, "IX", 1.052),
    ("U", 3, "VI", 1.025), ("U", 4, "VI", 0.89), ("U", 4, "VII", 0.95), ("U", 4, "VIII", 1.00),
    ("U", 4, "IX", 1.05), ("U", 4, "XII", 1.17), ("U", 5, "VI", 0.76), ("U", 5, "VII", 0.84),
    ("U", 6, "II", 0.45), ("U", 6, "IV", 0.52), ("U", 6, "VI", 0.73), ("U", 6, "VII", 0.81),
    ("U", 6, "VIII", 0.86),
    ("V", 2, "VI", 0.79), ("V", 3, "VI", 0.64), ("V", 4, "V", 0.53), ("V", 4, "VI", 0.58),
    ("V", 4, "VIII", 0.72), ("V", 5, "IV", 0.355), ("V", 5, "V", 0.46), ("V", 5, "VI", 0.54),
    ("W", 4, "VI", 0.66), ("W", 5, "VI", 0.62), ("W", 6, "IV", 0.42), ("W", 6, "V", 0.51),
    ("W", 6, "VI", 0.60),
    ("Xe", 8, "IV", 0.40), ("Xe", 8, "VI", 0.48),
    ("Y", 3, "VI", 0.90), ("Y", 3, "VII", 0.96), ("Y", 3, "VIII", 1.019), ("Y", 3, "IX", 1.075),
    ("Yb", 2, "VI", 1.02), ("Yb", 2, "VII", 1.08), ("Yb", 2, "VIII", 1.14), ("Yb", 3, "VI", 0.868),
    ("Yb", 3, "VII", 0.925), ("Yb", 3, "VIII", 0.985), ("Yb", 3, "IX", 1.042),
    ("Zn", 2, "IV", 0.60), ("Zn", 2, "V", 0.68), ("Zn", 2, "VI", 0.74), ("Zn", 2, "VIII", 0.90),
    ("Zr", 4, "IV", 0.59), ("Zr", 4, "V", 0.66), ("Zr", 4, "VI", 0.72), ("Zr", 4, "VII", 0.78),
    ("Zr", 4, "VIII", 0.84), ("Zr", 4, "IX", 0.89),
];

pub fn ionic_radius(symbol: &str, charge: i32, coordination: &str) -> Option<f64> {
    IONIC_RADII
        .iter()
        .find(|(s, q, cn, _)| *s == symbol && *q == charge && *cn == coordination)
        .map(|&(_, _, _, r)| r)
}

/// Position of an ion in [`IONIC_RADII`].
pub fn ion_index(symbol: &str, charge: i32, coordination: &str) -> Option<usize> {
    IONIC_RADII
        .iter()
        .position(|(s, q, cn, _)| *s == symbol && *q == charge && *cn == coordination)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chemistry::elements;
    use std::collections::HashSet;

    #[test]
    fn one_ion_from_each_block() {
        // s, p, d and f block
        assert_eq!(ionic_radius("Sr", 2, "XII"), Some(1.44));
        assert_eq!(ionic_radius("P", 5, "IV"), Some(0.17));
        assert_eq!(ionic_radius("Ge", 4, "IV"), Some(0.39));
        assert_eq!(ionic_radius("Mo", 6, "VI"), Some(0.59));
        assert_eq!(ionic_radius("Eu", 3, "VI"), Some(0.947));
        assert_eq!(ionic_radius("Gd", 3, "VIII"), Some(1.053));
        assert_eq!(ionic_radius("U", 6, "II"), Some(0.45));
        assert_eq!(ionic_radius("Mo", 6, "XII"), None);
    }

    #[test]
    fn table_keys_are_unique_known_elements() {
        let mut seen = HashSet::new();
        for &(symbol, charge, cn, _) in IONIC_RADII {
            assert!(elements::atomic_number(symbol).is_some(), "{} is not an element", symbol);
            assert!(seen.insert((symbol, charge, cn)), "{}{} {} listed twice", symbol, charge, cn);
        }
        assert_eq!(ion_index("Ac", 3, "VI"), Some(0));
        assert_eq!(ion_index("Zr", 4, "IX"), Some(IONIC_RADII.len() - 1));
    }
}
