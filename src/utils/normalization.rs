//! Normalização de texto para busca e geração de identificadores
//!
//! Busca livre na exclusão em massa e ids de funcionários/tarefas derivados
//! do nome dependem da mesma forma canônica: sem acentos, minúscula, só
//! alfanuméricos separados por um espaço.

use deunicode::deunicode;

/// Remove acentos, converte para lowercase, remove espaços extras e caracteres especiais
///
/// # Exemplos
/// ```
/// use agenda_equipe::utils::normalization::normalize_string;
///
/// assert_eq!(normalize_string("João & Silva Ltda."), "joao silva ltda");
/// assert_eq!(normalize_string("  Anne   Souza  "), "anne souza");
/// assert_eq!(normalize_string("Café & Cia"), "cafe cia");
/// ```
pub fn normalize_string(input: &str) -> String {
    deunicode(input)
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Identificador estável a partir de um nome: `"Reunião diária"` → `"reuniao_diaria"`
///
/// ```
/// use agenda_equipe::utils::normalization::slugify;
///
/// assert_eq!(slugify("Funcionário de Teste"), "funcionario_de_teste");
/// ```
pub fn slugify(input: &str) -> String {
    normalize_string(input).replace(' ', "_")
}

/// `true` se `termo` aparece em algum dos campos, ignorando acentos e caixa.
/// Termo vazio casa com tudo.
pub fn matches_search<'a>(termo: &str, campos: impl IntoIterator<Item = &'a str>) -> bool {
    let termo = normalize_string(termo);
    if termo.is_empty() {
        return true;
    }

    campos
        .into_iter()
        .any(|campo| normalize_string(campo).contains(&termo))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_string() {
        assert_eq!(normalize_string("João & Silva Ltda."), "joao silva ltda");
        assert_eq!(normalize_string("  Anne   Souza  "), "anne souza");
        assert_eq!(normalize_string(""), "");
        assert_eq!(normalize_string("Açaí"), "acai");
        assert_eq!(normalize_string("Müller & Co"), "muller co");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Reunião diária"), "reuniao_diaria");
        assert_eq!(slugify("Social Selling Insta"), "social_selling_insta");
        assert_eq!(slugify("Pausa/Intervalo"), "pausa_intervalo");
        assert_eq!(slugify("   "), "");
    }

    #[test]
    fn test_matches_search() {
        assert!(matches_search("andreia", ["Andréia", "2025-08-04"]));
        assert!(matches_search("REUNIAO", ["Reunião diária"]));
        assert!(matches_search("09:30", ["Guido", "09:30"]));
        assert!(matches_search("", ["qualquer"]));
        assert!(!matches_search("maria", ["Guido", "Pedro"]));
    }
}
