/*!
Helpers shared by the property tests: a naive matcher that interprets an
[`Ast`] directly, and generators for small patterns and haystacks.
*/

use std::collections::BTreeSet;

use char_automata::syntax::Ast;
use quickcheck::{Arbitrary, Gen};

/// Return every offset at which a match of `ast` beginning at `at` can end.
///
/// This is exponential in the worst case, but it follows the meaning of each
/// node so directly that it serves as the oracle for the automata.
pub fn ends(ast: &Ast, haystack: &str, at: usize) -> BTreeSet<usize> {
    let mut set = BTreeSet::new();
    match *ast {
        Ast::Literal(ref lit) => {
            if haystack[at..].starts_with(lit.as_str()) {
                set.insert(at + lit.len());
            }
        }
        Ast::Range(ref range) => {
            if let Some(ch) = haystack[at..].chars().next() {
                if range.contains(ch as u32) {
                    set.insert(at + ch.len_utf8());
                }
            }
        }
        Ast::Concat { ref head, ref tail } => {
            for mid in ends(head, haystack, at) {
                set.extend(ends(tail, haystack, mid));
            }
        }
        Ast::Alternation { ref left, ref right } => {
            set.extend(ends(left, haystack, at));
            set.extend(ends(right, haystack, at));
        }
        Ast::Repetition { ref inner } => {
            set.insert(at);
            let mut stack = vec![at];
            while let Some(pos) = stack.pop() {
                for end in ends(inner, haystack, pos) {
                    if set.insert(end) {
                        stack.push(end);
                    }
                }
            }
        }
        Ast::CountedRepetition { ref inner, min, max } => {
            let mut current = BTreeSet::new();
            current.insert(at);
            for i in 0..=max {
                if i >= min {
                    set.extend(current.iter().copied());
                }
                if i == max || current.is_empty() {
                    break;
                }
                let mut next = BTreeSet::new();
                for &pos in current.iter() {
                    next.extend(ends(inner, haystack, pos));
                }
                current = next;
            }
        }
    }
    set
}

/// Returns true if `ast` matches all of `haystack`.
pub fn full_match(ast: &Ast, haystack: &str) -> bool {
    ends(ast, haystack, 0).contains(&haystack.len())
}

/// Return the leftmost-longest match of `ast` in `haystack`.
pub fn find(ast: &Ast, haystack: &str) -> Option<(usize, usize)> {
    find_in(ast, haystack, (0, haystack.len()), false)
}

/// Return the leftmost-longest match of `ast` within `haystack[start..end]`.
/// An anchored search only considers matches beginning at `start`.
pub fn find_in(
    ast: &Ast,
    haystack: &str,
    (start, end): (usize, usize),
    anchored: bool,
) -> Option<(usize, usize)> {
    let region = &haystack[..end];
    let starts = boundaries(region).into_iter().filter(|&at| at >= start);
    for at in starts {
        if let Some(&e) = ends(ast, region, at).iter().next_back() {
            return Some((at, e));
        }
        if anchored {
            break;
        }
    }
    None
}

/// Every char boundary of `s`, including its length.
pub fn boundaries(s: &str) -> Vec<usize> {
    let mut offsets: Vec<usize> = s.char_indices().map(|(i, _)| i).collect();
    offsets.push(s.len());
    offsets
}

/// Pick an ordered pair of char boundaries of `s` from two arbitrary
/// numbers.
pub fn start_end(s: &str, a: usize, b: usize) -> (usize, usize) {
    let offsets = boundaries(s);
    let a = offsets[a % offsets.len()];
    let b = offsets[b % offsets.len()];
    (a.min(b), a.max(b))
}

/// A small pattern over a handful of characters, built from every
/// construct the parser supports.
#[derive(Clone, Debug)]
pub struct Pattern(pub String);

impl Arbitrary for Pattern {
    fn arbitrary(g: &mut Gen) -> Pattern {
        Pattern(gen_pattern(g, 3))
    }
}

fn gen_pattern(g: &mut Gen, depth: u32) -> String {
    let kinds = if depth == 0 { 2 } else { 7 };
    match usize::arbitrary(g) % kinds {
        0 => pick(g, &["a", "b", "c", "ab", "☃"]).to_string(),
        1 => pick(g, &["[ab]", "[^a]", "[a-c]", ".", r"\w", "[b☃]"])
            .to_string(),
        2 => format!(
            "{}{}",
            gen_pattern(g, depth - 1),
            gen_pattern(g, depth - 1),
        ),
        3 => format!(
            "(?:{}|{})",
            gen_pattern(g, depth - 1),
            gen_pattern(g, depth - 1),
        ),
        4 => format!("(?:{})*", gen_pattern(g, depth - 1)),
        5 => {
            let min = usize::arbitrary(g) % 3;
            let max = min + 1 + usize::arbitrary(g) % 2;
            format!("(?:{}){{{},{}}}", gen_pattern(g, depth - 1), min, max)
        }
        _ => {
            let op = pick(g, &["+", "?"]);
            format!("(?:{}){}", gen_pattern(g, depth - 1), op)
        }
    }
}

/// A short haystack drawn from the characters that `Pattern` mentions, plus
/// a few it never does.
#[derive(Clone, Debug)]
pub struct Haystack(pub String);

impl Arbitrary for Haystack {
    fn arbitrary(g: &mut Gen) -> Haystack {
        let len = usize::arbitrary(g) % 8;
        let chars = ['a', 'b', 'c', 'x', '☃', '\n'];
        let text = (0..len).map(|_| *g.choose(&chars).unwrap()).collect();
        Haystack(text)
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Haystack>> {
        Box::new(self.0.shrink().map(Haystack))
    }
}

fn pick<'a>(g: &mut Gen, choices: &[&'a str]) -> &'a str {
    *g.choose(choices).unwrap()
}

#[test]
fn naive_matcher() {
    let ast = char_automata::syntax::parse("a(b|bc)*").unwrap();
    assert_eq!(
        vec![1, 2, 3, 4],
        ends(&ast, "abcb", 0).into_iter().collect::<Vec<_>>(),
    );
    assert!(full_match(&ast, "abcb"));
    assert_eq!(Some((1, 4)), find(&ast, "xabc"));
    assert_eq!(Some((1, 2)), find_in(&ast, "xabc", (1, 2), true));
    assert_eq!(None, find_in(&ast, "xabc", (0, 4), true));
    assert_eq!(None, find_in(&ast, "xabc", (2, 4), false));

    let ast = char_automata::syntax::parse("(?:a|b){2,3}").unwrap();
    assert!(!full_match(&ast, "a"));
    assert!(full_match(&ast, "ab"));
    assert!(full_match(&ast, "aba"));
    assert!(!full_match(&ast, "abab"));
}
