use super::{PARAMETER_SENTINEL, format_scientific};
use crate::domain::{ConvertError, ConvertResult, LayerPosition, LayerStack};
use std::ops::Range;
use tracing::debug;

/// What to do with a recognized parameter name. The table is exhaustive:
/// a name outside it fails the whole transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FeatureAction {
    /// Replace the line's value with the named layer feature.
    Substitute(&'static str),
    /// The value cannot be derived from a GenX export; mark it for manual
    /// entry with a literal `???`.
    Placeholder,
}

const FEATURE_ACTIONS: [(&str, FeatureAction); 4] = [
    ("layer thickness", FeatureAction::Substitute("setD")),
    ("sigma layer in A", FeatureAction::Substitute("setSigma")),
    ("disp / n*b layer", FeatureAction::Placeholder),
    ("di_nb/beta layer", FeatureAction::Placeholder),
];

fn feature_action(name: &str) -> Option<FeatureAction> {
    FEATURE_ACTIONS
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, action)| *action)
}

/// Classification of one body line, independent of the surrounding loop.
#[derive(Debug, Clone, PartialEq)]
enum LineClass {
    /// Whitespace-only line, emitted unchanged.
    Blank,
    /// First token is not a number: the transformable region has ended and
    /// this line plus everything after it is discarded.
    Terminal,
    /// Digit-led line that does not carry the `part <g> at <i>` triple;
    /// emitted unchanged.
    Passthrough,
    /// Parameter line addressing a layer position.
    Data {
        name: String,
        position: LayerPosition,
    },
}

fn classify_line(content: &str) -> LineClass {
    let tokens: Vec<&str> = content.split_whitespace().collect();
    let Some(first) = tokens.first() else {
        return LineClass::Blank;
    };
    if !first.chars().all(|c| c.is_ascii_digit()) {
        return LineClass::Terminal;
    }
    // <index> <name-tokens...> part <g> at <i> <value> <increment>
    if tokens.len() < 8 {
        return LineClass::Passthrough;
    }
    let triple = tokens.len() - 6;
    if tokens[triple] != "part" || tokens[triple + 2] != "at" {
        return LineClass::Passthrough;
    }
    let (Ok(group), Ok(index)) = (
        tokens[triple + 1].parse::<u32>(),
        tokens[triple + 3].parse::<u32>(),
    ) else {
        return LineClass::Passthrough;
    };
    LineClass::Data {
        name: tokens[1..triple].join(" "),
        position: LayerPosition::new(group, index),
    }
}

/// Rewrites the value field of each parameter line of an LSFIT template,
/// leaving every other byte of the emitted lines untouched.
///
/// Lines up to and including the sentinel are skipped; the first
/// non-digit-led line after it ends the transformable region and is
/// discarded together with everything that follows (the caller frames the
/// body with its own header and tail). Any error discards the whole
/// output.
pub fn transform_template(template: &str, stack: &LayerStack) -> ConvertResult<String> {
    let mut segments = template.split_inclusive('\n');
    let mut sentinel_found = false;
    for segment in segments.by_ref() {
        if segment.contains(PARAMETER_SENTINEL) {
            sentinel_found = true;
            break;
        }
    }
    if !sentinel_found {
        return Err(ConvertError::MissingHeader);
    }

    let mut output = String::with_capacity(template.len());
    let mut emitted = 0_usize;
    for segment in segments {
        let content = segment.trim_end_matches(['\n', '\r']);
        match classify_line(content) {
            LineClass::Blank | LineClass::Passthrough => output.push_str(segment),
            LineClass::Terminal => {
                debug!(emitted, "template region ended");
                return Ok(output);
            }
            LineClass::Data { name, position } => {
                if position.is_instrument_scope() {
                    output.push_str(segment);
                } else {
                    let rewritten = substitute_line(content, &name, position, stack)?;
                    output.push_str(&rewritten);
                    output.push_str(&segment[content.len()..]);
                }
            }
        }
        emitted += 1;
    }
    debug!(emitted, "template region ran to end of input");
    Ok(output)
}

fn substitute_line(
    content: &str,
    name: &str,
    position: LayerPosition,
    stack: &LayerStack,
) -> ConvertResult<String> {
    let layer = stack
        .get(position)
        .ok_or(ConvertError::UnknownPosition { position })?;
    let action = feature_action(name).ok_or_else(|| ConvertError::UnrecognizedFeatureName {
        name: name.to_string(),
    })?;
    let replacement = match action {
        FeatureAction::Substitute(key) => {
            let value = layer
                .feature(key)
                .ok_or_else(|| ConvertError::MissingFeature {
                    substance: layer.substance.clone(),
                    position,
                    feature: key.to_string(),
                })?;
            format_scientific(value)
        }
        FeatureAction::Placeholder => "???".to_string(),
    };
    Ok(replace_first_number(content, &replacement))
}

/// Replaces the first decimal number in the line (digits, a point, digits,
/// with any attached exponent) and leaves the rest of the line as-is. A
/// line with no such number is returned unchanged.
fn replace_first_number(content: &str, replacement: &str) -> String {
    match find_first_number(content) {
        Some(span) => {
            let mut rewritten =
                String::with_capacity(content.len() + replacement.len() - span.len());
            rewritten.push_str(&content[..span.start]);
            rewritten.push_str(replacement);
            rewritten.push_str(&content[span.end..]);
            rewritten
        }
        None => content.to_string(),
    }
}

fn find_first_number(content: &str) -> Option<Range<usize>> {
    let bytes = content.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if !bytes[i].is_ascii_digit() {
            i += 1;
            continue;
        }
        let start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i < bytes.len()
            && bytes[i] == b'.'
            && i + 1 < bytes.len()
            && bytes[i + 1].is_ascii_digit()
        {
            i += 1;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            i = consume_exponent(bytes, i);
            return Some(start..i);
        }
        // bare integer such as a line index or position, keep scanning
    }
    None
}

fn consume_exponent(bytes: &[u8], from: usize) -> usize {
    if from >= bytes.len() || !matches!(bytes[from], b'e' | b'E') {
        return from;
    }
    let mut j = from + 1;
    if j < bytes.len() && matches!(bytes[j], b'+' | b'-') {
        j += 1;
    }
    if j >= bytes.len() || !bytes[j].is_ascii_digit() {
        return from;
    }
    while j < bytes.len() && bytes[j].is_ascii_digit() {
        j += 1;
    }
    j
}
