//! Recursive `${...}` placeholder substitution.
//!
//! The evaluator replaces every `${key}` occurrence through a caller-supplied
//! lookup until a fixed point is reached. A placeholder whose key is unknown
//! is left textually intact; callers detect unresolved values by searching
//! the result for `${`. The evaluator never fails.

/// Upper bound on substitution passes. Mutually recursive properties converge
/// well below this; self-referential definitions stop here instead of looping.
const MAX_PASSES: usize = 8;

/// Returns true when `text` still carries at least one `${...}` reference.
pub fn contains_placeholder(text: &str) -> bool {
    text.contains("${")
}

/// Replaces `${key}` references in `text` via `lookup`, repeating until no
/// further substitution applies or the pass bound is hit.
pub fn evaluate<F>(text: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut current = text.to_string();
    for _ in 0..MAX_PASSES {
        match substitute_once(&current, &lookup) {
            Some(next) => current = next,
            None => break,
        }
    }
    current
}

/// Single left-to-right substitution pass. Returns `None` when nothing was
/// replaced, which terminates the fixed-point loop.
fn substitute_once<F>(text: &str, lookup: &F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    if !text.contains("${") {
        return None;
    }

    let mut output = String::with_capacity(text.len());
    let mut rest = text;
    let mut replaced = false;

    while let Some(start) = rest.find("${") {
        output.push_str(&rest[..start]);
        let suffix = &rest[start + 2..];
        let Some(end) = suffix.find('}') else {
            // 閉じられていない参照はそのまま残す
            output.push_str(&rest[start..]);
            rest = "";
            break;
        };
        let key = &suffix[..end];
        match lookup(key) {
            Some(value) => {
                output.push_str(&value);
                replaced = true;
            }
            None => {
                output.push_str("${");
                output.push_str(key);
                output.push('}');
            }
        }
        rest = &suffix[end + 1..];
    }
    output.push_str(rest);

    replaced.then_some(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_in<'a>(properties: &'a HashMap<&str, &str>) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| properties.get(key).map(|value| value.to_string())
    }

    #[test]
    fn replaces_simple_placeholders() {
        let properties = HashMap::from([("rev", "1.2.3")]);
        assert_eq!(
            evaluate("demo-${rev}", lookup_in(&properties)),
            "demo-1.2.3"
        );
    }

    #[test]
    fn unknown_placeholders_stay_intact() {
        let properties = HashMap::from([("known", "x")]);
        assert_eq!(
            evaluate("${known}-${unknown}", lookup_in(&properties)),
            "x-${unknown}"
        );
        assert!(contains_placeholder("x-${unknown}"));
    }

    #[test]
    fn resolves_transitive_references() {
        let properties = HashMap::from([("a", "${b}"), ("b", "${c}"), ("c", "leaf")]);
        assert_eq!(evaluate("${a}", lookup_in(&properties)), "leaf");
    }

    #[test]
    fn self_referential_definitions_terminate() {
        let properties = HashMap::from([("loop", "${loop}")]);
        let result = evaluate("${loop}", lookup_in(&properties));
        assert_eq!(result, "${loop}");
    }

    #[test]
    fn unterminated_reference_is_preserved() {
        let properties = HashMap::from([("rev", "1.0")]);
        assert_eq!(
            evaluate("${rev}-${broken", lookup_in(&properties)),
            "1.0-${broken"
        );
    }

    #[test]
    fn evaluates_multiple_placeholders_in_one_value() {
        let properties = HashMap::from([("foo", "child"), ("bar", "parent")]);
        assert_eq!(
            evaluate("${foo}-${bar}", lookup_in(&properties)),
            "child-parent"
        );
    }
}
