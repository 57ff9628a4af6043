//! Basis sets embedded in the crate, stored in NWChem format.

use crate::basis::BasisError;
use crate::cgto::AtomicBasis;

const H_STO_3G: &str = "
BASIS \"ao basis\" PRINT
#BASIS SET: (3s) -> [1s]
H    S
      3.42525091             0.15432897
      0.62391373             0.53532814
      0.16885540             0.44463454
END
";

const HE_STO_3G: &str = "
BASIS \"ao basis\" PRINT
#BASIS SET: (3s) -> [1s]
He    S
      6.36242139             0.15432897
      1.15892300             0.53532814
      0.31364979             0.44463454
END
";

const H_6_31G: &str = "
BASIS \"ao basis\" PRINT
#BASIS SET: (4s) -> [2s]
H    S
      0.1873113696E+02       0.3349460434E-01
      0.2825394365E+01       0.2347269535E+00
      0.6401216923E+00       0.8137573261E+00
H    S
      0.1612777588E+00       1.0000000
END
";

const HE_6_31G: &str = "
BASIS \"ao basis\" PRINT
#BASIS SET: (4s) -> [2s]
He    S
      0.3842163400E+02       0.2376600000E-01
      0.5778030000E+01       0.1546790000E+00
      0.1241774000E+01       0.4696300000E+00
He    S
      0.2979640000E+00       1.0000000
END
";

fn normalize_name(basis: &str) -> String {
    basis.trim().to_lowercase().replace(['-', '_'], "")
}

/// Raw NWChem text for `symbol` in `basis`, if embedded.
pub fn builtin_text(symbol: &str, basis: &str) -> Option<&'static str> {
    match (symbol.to_lowercase().as_str(), normalize_name(basis).as_str()) {
        ("h", "sto3g") => Some(H_STO_3G),
        ("he", "sto3g") => Some(HE_STO_3G),
        ("h", "631g") => Some(H_6_31G),
        ("he", "631g") => Some(HE_6_31G),
        _ => None,
    }
}

/// Parsed embedded basis for `symbol`.
pub fn builtin(symbol: &str, basis: &str) -> Result<AtomicBasis, BasisError> {
    let text = builtin_text(symbol, basis).ok_or_else(|| BasisError::NotInLibrary {
        symbol: symbol.to_string(),
        basis: basis.to_string(),
    })?;
    AtomicBasis::parse_nwchem(basis, text)
}
