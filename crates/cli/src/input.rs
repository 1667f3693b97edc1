//! Stdin problem parser.
//!
//! The input is a free-form token stream:
//!
//! ```text
//! Number of angles: <n>
//! <a_1> <b_1> <c_1>
//! ...
//! <a_n> <b_n> <c_n>
//! Index to fix mu: <F>
//! Number of initial sofas: <k>
//! Target: <p/q>
//! ```
//!
//! Each triple defines the unit normal `(a/c, b/c)` and must be
//! pythagorean; angles arrive in ascending slope.

use anyhow::{bail, ensure, Context, Result};
use sofa::geom::{rat, Coord, Rat};

pub struct Problem {
    pub normals: Vec<Coord>,
    pub mu_fix_idx: usize,
    pub num_sofas: usize,
    pub target: Rat,
}

struct Tokens<'a> {
    iter: std::str::SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Tokens<'a> {
        Tokens {
            iter: text.split_whitespace(),
        }
    }

    fn next(&mut self, what: &str) -> Result<&'a str> {
        self.iter
            .next()
            .with_context(|| format!("unexpected end of input, expected {what}"))
    }

    fn expect_label(&mut self, label: &str) -> Result<()> {
        for word in label.split_whitespace() {
            let tok = self.next(&format!("`{word}`"))?;
            ensure!(tok == word, "expected `{word}`, found `{tok}`");
        }
        Ok(())
    }

    fn int(&mut self, what: &str) -> Result<i64> {
        let tok = self.next(what)?;
        tok.parse::<i64>()
            .with_context(|| format!("{what}: `{tok}` is not an integer"))
    }

    fn usize(&mut self, what: &str) -> Result<usize> {
        let tok = self.next(what)?;
        tok.parse::<usize>()
            .with_context(|| format!("{what}: `{tok}` is not a non-negative integer"))
    }

    fn rational(&mut self, what: &str) -> Result<Rat> {
        let tok = self.next(what)?;
        tok.parse::<Rat>()
            .with_context(|| format!("{what}: `{tok}` is not a rational (`p/q`)"))
    }
}

pub fn parse_problem(text: &str) -> Result<Problem> {
    let mut tokens = Tokens::new(text);

    tokens.expect_label("Number of angles:")?;
    let n = tokens.usize("number of angles")?;
    ensure!(n >= 1, "need at least one angle");

    let mut normals = Vec::with_capacity(n);
    for i in 0..n {
        let a = tokens.int("normal numerator a")?;
        let b = tokens.int("normal numerator b")?;
        let c = tokens.int("normal denominator c")?;
        ensure!(
            (a as i128) * (a as i128) + (b as i128) * (b as i128) == (c as i128) * (c as i128),
            "triple ({a}, {b}, {c}) is not pythagorean"
        );
        ensure!(a > 0 && b > 0 && c > 0, "normal components must be positive");
        normals.push(Coord::new(rat(a, c), rat(b, c)));
    }
    for w in normals.windows(2) {
        // slope of the boundary normal to (x, y) is -x/y
        let s0 = -(&w[0].x / &w[0].y);
        let s1 = -(&w[1].x / &w[1].y);
        if s0 >= s1 {
            bail!("angles must arrive in ascending slope order");
        }
    }

    tokens.expect_label("Index to fix mu:")?;
    let mu_fix_idx = tokens.usize("fixed mu index")?;
    ensure!(mu_fix_idx < n, "fixed mu index {mu_fix_idx} out of range 0..{n}");

    tokens.expect_label("Number of initial sofas:")?;
    let num_sofas = tokens.usize("number of initial sofas")?;
    ensure!(num_sofas >= 1, "need at least one initial sofa");

    tokens.expect_label("Target:")?;
    let target = tokens.rational("target area")?;

    Ok(Problem {
        normals,
        mu_fix_idx,
        num_sofas,
        target,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Number of angles: 5
24 7 25
56 33 65
120 119 169
33 56 65
7 24 25
Index to fix mu: 2
Number of initial sofas: 3
Target: 431/250
";

    #[test]
    fn parses_the_sample_problem() {
        let p = parse_problem(SAMPLE).unwrap();
        assert_eq!(p.normals.len(), 5);
        assert_eq!(p.normals[0], Coord::new(rat(24, 25), rat(7, 25)));
        assert_eq!(p.mu_fix_idx, 2);
        assert_eq!(p.num_sofas, 3);
        assert_eq!(p.target, rat(431, 250));
    }

    #[test]
    fn rejects_non_pythagorean_triples() {
        let text = SAMPLE.replace("24 7 25", "24 8 25");
        assert!(parse_problem(&text).is_err());
    }

    #[test]
    fn rejects_out_of_range_fix_index() {
        let text = SAMPLE.replace("Index to fix mu: 2", "Index to fix mu: 5");
        assert!(parse_problem(&text).is_err());
    }

    #[test]
    fn rejects_descending_slopes() {
        let text = "\
Number of angles: 2
7 24 25
24 7 25
Index to fix mu: 0
Number of initial sofas: 1
Target: 3
";
        assert!(parse_problem(text).is_err());
    }
}
