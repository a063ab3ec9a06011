use crate::core::structure::{Atom, Crystal};
use anyhow::{Context, Result};
use std::collections::{BTreeMap, HashMap};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// CIF type symbol: `Ti4+` for ions, the bare element otherwise.
fn type_symbol(atom: &Atom) -> String {
    match atom.oxidation_state {
        Some(q) if q != 0 => {
            let sign = if q < 0 { '-' } else { '+' };
            format!("{}{}{}", atom.element, q.abs(), sign)
        }
        _ => atom.element.clone(),
    }
}

/// Renders a P1 CIF block. Ions get an `_atom_type_oxidation_number` loop.
pub fn format_cif(crystal: &Crystal, data_name: &str) -> String {
    let p = crystal.lattice.to_parameters();
    let mut out = String::new();
    let block: String = data_name
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect();

    // writing into a String cannot fail
    let _ = writeln!(out, "data_{}", block);
    let _ = writeln!(out, "_symmetry_space_group_name_H-M   'P 1'");
    let _ = writeln!(out, "_symmetry_Int_Tables_number      1");
    let _ = writeln!(out, "_cell_length_a    {:.6}", p.a);
    let _ = writeln!(out, "_cell_length_b    {:.6}", p.b);
    let _ = writeln!(out, "_cell_length_c    {:.6}", p.c);
    let _ = writeln!(out, "_cell_angle_alpha {:.6}", p.alpha);
    let _ = writeln!(out, "_cell_angle_beta  {:.6}", p.beta);
    let _ = writeln!(out, "_cell_angle_gamma {:.6}", p.gamma);
    let _ = writeln!(out, "_cell_volume      {:.6}", crystal.lattice.volume());
    out.push_str("\nloop_\n_symmetry_equiv_pos_as_xyz\n  'x, y, z'\n");

    let ions: BTreeMap<String, i32> = crystal
        .atoms
        .iter()
        .filter_map(|a| a.oxidation_state.filter(|&q| q != 0).map(|q| (type_symbol(a), q)))
        .collect();
    if !ions.is_empty() {
        out.push_str("\nloop_\n_atom_type_symbol\n_atom_type_oxidation_number\n");
        for (symbol, q) in &ions {
            let _ = writeln!(out, "  {:<6} {:>3}", symbol, q);
        }
    }

    out.push_str(
        "\nloop_\n_atom_site_label\n_atom_site_type_symbol\n\
         _atom_site_fract_x\n_atom_site_fract_y\n_atom_site_fract_z\n_atom_site_occupancy\n",
    );
    let mut counters: HashMap<&str, usize> = HashMap::new();
    for atom in &crystal.atoms {
        let n = counters.entry(atom.element.as_str()).or_insert(0);
        *n += 1;
        let f = atom.fractional_coords;
        let _ = writeln!(
            out,
            "  {:<6} {:<6} {:>10.6} {:>10.6} {:>10.6}  1.0",
            format!("{}{}", atom.element, n),
            type_symbol(atom),
            f.x,
            f.y,
            f.z
        );
    }
    out
}

/// Writes a P1 CIF to `path`, naming the data block after the file stem.
pub fn to_cif(crystal: &Crystal, path: &Path) -> Result<()> {
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "crystal_sat".to_string());
    fs::write(path, format_cif(crystal, &name))
        .with_context(|| format!("Could not write CIF file: {:?}", path))
}
