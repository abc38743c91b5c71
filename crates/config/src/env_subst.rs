/// Replace `${NAME}` placeholders with values from the process environment.
///
/// Placeholders whose variable is unset, and unterminated `${`, are kept
/// verbatim.
pub fn substitute_env(input: &str) -> String {
    substitute_with(input, |name| std::env::var(name).ok())
}

fn substitute_with(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };

        let name = &after[..end];
        match (!name.is_empty()).then(|| lookup(name)).flatten() {
            Some(value) => out.push_str(&value),
            None => out.push_str(&rest[start..start + 2 + end + 1]),
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest};

    fn lookup(name: &str) -> Option<String> {
        match name {
            "DISCORD_BOT_TOKEN" => Some("abc.def".into()),
            "ASSET_DIR" => Some("/srv/frames".into()),
            _ => None,
        }
    }

    #[rstest]
    #[case("token = \"${DISCORD_BOT_TOKEN}\"", "token = \"abc.def\"")]
    #[case("${ASSET_DIR}/epic.png", "/srv/frames/epic.png")]
    #[case("${ASSET_DIR}${ASSET_DIR}", "/srv/frames/srv/frames")]
    #[case("${UNSET_VAR}", "${UNSET_VAR}")]
    #[case("${}", "${}")]
    #[case("cost: $5 {braces}", "cost: $5 {braces}")]
    #[case("open ${ASSET_DIR", "open ${ASSET_DIR")]
    #[case("", "")]
    fn substitution(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(substitute_with(input, lookup), expected);
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(substitute_env("no placeholders"), "no placeholders");
    }
}
