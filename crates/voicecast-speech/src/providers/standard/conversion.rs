//! Conversion of plain text and unified parameters into the engine's markup

use crate::markup::{FOOTER, escape_markup, header};
use crate::params::{StandardProsody, SynthesisParameters};

/// Wrap plain text in a single-voice document carrying style and prosody
pub fn wrap_plain_text(text: &str, params: &SynthesisParameters, language: &str) -> String {
    let prosody = StandardProsody::from(params);
    format!(
        "{header}\n    <voice name=\"{voice}\">\n        <mstts:express-as style=\"{style}\" styledegree=\"{degree}\">\n            <prosody rate=\"{rate}\" volume=\"{volume}\">\n                {text}\n            </prosody>\n        </mstts:express-as>\n    </voice>\n{FOOTER}",
        header = header(language),
        voice = escape_markup(params.voice_id()),
        style = escape_markup(params.style()),
        degree = prosody.style_degree,
        rate = prosody.rate,
        volume = prosody.volume,
        text = escape_markup(text),
    )
}
