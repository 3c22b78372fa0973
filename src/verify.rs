// Re-checks a generated corpus against the reference transform.

use std::io::BufRead;

use crate::encoder::{decode_input, decode_output};
use crate::error::Result;
use crate::transform::transform;
use crate::variant::Variant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Match,
    /// Expected output differs from the transform only by an inverted last byte.
    Corrupted,
    Mismatch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineReport {
    pub line: usize,
    pub verdict: Verdict,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyReport {
    pub in_lines: usize,
    pub out_lines: usize,
    pub lines: Vec<LineReport>,
}

impl VerifyReport {
    pub fn count(&self, verdict: Verdict) -> usize {
        self.lines.iter().filter(|l| l.verdict == verdict).count()
    }

    /// Line counts agree and every mismatch is an injected corruption.
    pub fn is_consistent(&self) -> bool {
        self.in_lines == self.out_lines && self.count(Verdict::Mismatch) == 0
    }
}

pub fn classify(expected: &[u8], actual: &[u8]) -> Verdict {
    if expected == actual {
        return Verdict::Match;
    }
    match (expected.split_last(), actual.split_last()) {
        (Some((e_last, e_rest)), Some((a_last, a_rest))) if e_rest == a_rest && *e_last == !*a_last => {
            Verdict::Corrupted
        }
        _ => Verdict::Mismatch,
    }
}

pub fn verify_corpus<I: BufRead, O: BufRead>(variant: &Variant, pkts_in: I, pkts_out: O) -> Result<VerifyReport> {
    let in_lines = pkts_in.lines().collect::<std::io::Result<Vec<_>>>()?;
    let out_lines = pkts_out.lines().collect::<std::io::Result<Vec<_>>>()?;

    let mut report = VerifyReport {
        in_lines: in_lines.len(),
        out_lines: out_lines.len(),
        lines: Vec::with_capacity(in_lines.len()),
    };

    for (i, (in_text, out_text)) in in_lines.iter().zip(&out_lines).enumerate() {
        let line = i + 1;
        let input = decode_input(variant, in_text, line)?;
        let output = decode_output(variant, out_text, line)?;

        let verdict = if output.direction.is_some_and(|d| d != input.direction) {
            Verdict::Mismatch
        } else {
            let reference = transform(
                variant.key_size,
                &input.key,
                &input.secondary,
                input.direction,
                &input.input,
            )?;
            classify(&output.output, &reference)
        };
        report.lines.push(LineReport { line, verdict });
    }

    Ok(report)
}
