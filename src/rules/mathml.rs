//! MathML to LaTeX.
//!
//! Covers presentation MathML as emitted by MathJax, KaTeX, MediaWiki and
//! LaTeXML: token elements, rows, scripts and limits, fractions, radicals,
//! fences, enclosures and tables. Unknown elements contribute their
//! children, so partial support degrades to readable output.
//!
//! ```
//! use clipmark::dom::{parse_html, NodeRef};
//! use clipmark::rules::mathml::mathml_to_latex;
//!
//! let dom = parse_html("<math><msup><mi>x</mi><mn>2</mn></msup></math>");
//! let math = NodeRef::document(&dom).find_tag("math").unwrap();
//! assert_eq!(mathml_to_latex(math).unwrap(), "x^{2}");
//! ```

use crate::dom::NodeRef;
use crate::error::Error;
use crate::markdown::MAX_DEPTH;

use super::RuleError;

/// Convert a MathML element (usually `<math>`) to LaTeX.
///
/// Markup nested deeper than [`MAX_DEPTH`] fails the whole document, like
/// the Markdown walk does.
pub fn mathml_to_latex(node: NodeRef<'_>) -> Result<String, RuleError> {
    if !node.is_element() {
        return Err(RuleError::MathMl("expected a MathML element".to_string()));
    }
    if node.height() > MAX_DEPTH {
        return Err(Error::DepthExceeded { limit: MAX_DEPTH }.into());
    }
    Ok(convert(node).trim().to_string())
}

const GREEK: &[(char, &str)] = &[
    ('α', "\\alpha"),
    ('β', "\\beta"),
    ('γ', "\\gamma"),
    ('δ', "\\delta"),
    ('ε', "\\varepsilon"),
    ('ϵ', "\\epsilon"),
    ('ζ', "\\zeta"),
    ('η', "\\eta"),
    ('θ', "\\theta"),
    ('ϑ', "\\vartheta"),
    ('ι', "\\iota"),
    ('κ', "\\kappa"),
    ('λ', "\\lambda"),
    ('μ', "\\mu"),
    ('ν', "\\nu"),
    ('ξ', "\\xi"),
    ('π', "\\pi"),
    ('ϖ', "\\varpi"),
    ('ρ', "\\rho"),
    ('ϱ', "\\varrho"),
    ('σ', "\\sigma"),
    ('ς', "\\varsigma"),
    ('τ', "\\tau"),
    ('υ', "\\upsilon"),
    ('φ', "\\varphi"),
    ('ϕ', "\\phi"),
    ('χ', "\\chi"),
    ('ψ', "\\psi"),
    ('ω', "\\omega"),
    ('Γ', "\\Gamma"),
    ('Δ', "\\Delta"),
    ('Θ', "\\Theta"),
    ('Λ', "\\Lambda"),
    ('Ξ', "\\Xi"),
    ('Π', "\\Pi"),
    ('Σ', "\\Sigma"),
    ('Υ', "\\Upsilon"),
    ('Φ', "\\Phi"),
    ('Ψ', "\\Psi"),
    ('Ω', "\\Omega"),
];

const OPERATORS: &[(char, &str)] = &[
    ('±', "\\pm"),
    ('∓', "\\mp"),
    ('×', "\\times"),
    ('÷', "\\div"),
    ('·', "\\cdot"),
    ('⋅', "\\cdot"),
    ('∗', "\\ast"),
    ('∘', "\\circ"),
    ('∙', "\\bullet"),
    ('⋆', "\\star"),
    ('†', "\\dagger"),
    ('−', "-"),
    ('≤', "\\leq"),
    ('≥', "\\geq"),
    ('≠', "\\neq"),
    ('≈', "\\approx"),
    ('≡', "\\equiv"),
    ('∼', "\\sim"),
    ('≃', "\\simeq"),
    ('≅', "\\cong"),
    ('∝', "\\propto"),
    ('≪', "\\ll"),
    ('≫', "\\gg"),
    ('≺', "\\prec"),
    ('≻', "\\succ"),
    ('∈', "\\in"),
    ('∉', "\\notin"),
    ('∋', "\\ni"),
    ('⊂', "\\subset"),
    ('⊃', "\\supset"),
    ('⊆', "\\subseteq"),
    ('⊇', "\\supseteq"),
    ('∪', "\\cup"),
    ('∩', "\\cap"),
    ('∖', "\\setminus"),
    ('∅', "\\emptyset"),
    ('∀', "\\forall"),
    ('∃', "\\exists"),
    ('¬', "\\neg"),
    ('∧', "\\wedge"),
    ('∨', "\\vee"),
    ('⊕', "\\oplus"),
    ('⊗', "\\otimes"),
    ('⊢', "\\vdash"),
    ('⊨', "\\models"),
    ('⊤', "\\top"),
    ('⊥', "\\perp"),
    ('∥', "\\parallel"),
    ('∣', "\\mid"),
    ('∠', "\\angle"),
    ('∴', "\\therefore"),
    ('∵', "\\because"),
    ('→', "\\rightarrow"),
    ('←', "\\leftarrow"),
    ('↔', "\\leftrightarrow"),
    ('⇒', "\\Rightarrow"),
    ('⇐', "\\Leftarrow"),
    ('⇔', "\\Leftrightarrow"),
    ('↦', "\\mapsto"),
    ('∞', "\\infty"),
    ('∂', "\\partial"),
    ('∇', "\\nabla"),
    ('ℏ', "\\hbar"),
    ('ℓ', "\\ell"),
    ('ℜ', "\\Re"),
    ('ℑ', "\\Im"),
    ('ℵ', "\\aleph"),
    ('∑', "\\sum"),
    ('∏', "\\prod"),
    ('∐', "\\coprod"),
    ('∫', "\\int"),
    ('∬', "\\iint"),
    ('∭', "\\iiint"),
    ('∮', "\\oint"),
    ('⋃', "\\bigcup"),
    ('⋂', "\\bigcap"),
    ('⨁', "\\bigoplus"),
    ('⨂', "\\bigotimes"),
    ('√', "\\surd"),
    ('…', "\\ldots"),
    ('⋯', "\\cdots"),
    ('⋮', "\\vdots"),
    ('⋱', "\\ddots"),
    ('′', "'"),
    ('″', "''"),
    ('‖', "\\|"),
    ('⟨', "\\langle"),
    ('⟩', "\\rangle"),
    ('⌈', "\\lceil"),
    ('⌉', "\\rceil"),
    ('⌊', "\\lfloor"),
    ('⌋', "\\rfloor"),
    ('°', "^{\\circ}"),
    ('{', "\\{"),
    ('}', "\\}"),
    ('%', "\\%"),
    ('#', "\\#"),
    ('&', "\\&"),
    ('$', "\\$"),
    ('_', "\\_"),
    // Invisible function application, times, separator and plus.
    ('\u{2061}', ""),
    ('\u{2062}', ""),
    ('\u{2063}', ","),
    ('\u{2064}', ""),
];

const FUNCTIONS: &[&str] = &[
    "sin", "cos", "tan", "cot", "sec", "csc", "arcsin", "arccos", "arctan", "sinh", "cosh",
    "tanh", "coth", "log", "ln", "lg", "exp", "lim", "liminf", "limsup", "max", "min", "sup",
    "inf", "det", "dim", "gcd", "deg", "arg", "ker", "hom", "Pr",
];

/// Operators whose scripts are typeset as limits.
const LARGE_OPERATORS: &[&str] = &[
    "\\sum",
    "\\prod",
    "\\coprod",
    "\\int",
    "\\iint",
    "\\iiint",
    "\\oint",
    "\\bigcup",
    "\\bigcap",
    "\\bigoplus",
    "\\bigotimes",
    "\\lim",
    "\\liminf",
    "\\limsup",
    "\\max",
    "\\min",
    "\\sup",
    "\\inf",
];

fn symbol(c: char) -> Option<&'static str> {
    GREEK
        .iter()
        .chain(OPERATORS)
        .find(|(k, _)| *k == c)
        .map(|(_, v)| *v)
}

/// Append a LaTeX token, separating a control word from a following letter.
fn push_token(out: &mut String, token: &str) {
    if token.is_empty() {
        return;
    }
    let ends_with_command = {
        let letters = out.len() - out.trim_end_matches(|c: char| c.is_ascii_alphabetic()).len();
        letters > 0 && out[..out.len() - letters].ends_with('\\')
    };
    if ends_with_command && token.starts_with(|c: char| c.is_ascii_alphabetic()) {
        out.push(' ');
    }
    out.push_str(token);
}

fn map_symbols(text: &str) -> String {
    let mut out = String::new();
    let mut buf = [0u8; 4];
    for c in text.chars() {
        match symbol(c) {
            Some(latex) => push_token(&mut out, latex),
            None => push_token(&mut out, c.encode_utf8(&mut buf)),
        }
    }
    out
}

/// Brace a script base unless it is a single character or control word.
fn group(latex: &str) -> String {
    let single_char = latex.chars().count() == 1;
    let single_command = latex
        .strip_prefix('\\')
        .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_alphabetic()));
    if single_char || single_command {
        latex.to_string()
    } else {
        format!("{{{latex}}}")
    }
}

fn args<'a>(node: NodeRef<'a>) -> Vec<NodeRef<'a>> {
    node.element_children().collect()
}

fn arg(args: &[NodeRef<'_>], index: usize) -> String {
    args.get(index).map(|n| convert(*n)).unwrap_or_default()
}

fn row(node: NodeRef<'_>) -> String {
    let mut out = String::new();
    for child in node.children() {
        if child.is_element() {
            push_token(&mut out, &convert(child));
        } else if let Some(text) = child.text() {
            push_token(&mut out, &map_symbols(text.trim()));
        }
    }
    out
}

fn convert(node: NodeRef<'_>) -> String {
    let Some(tag) = node.tag() else {
        return node.text().map(|t| map_symbols(t.trim())).unwrap_or_default();
    };

    match tag {
        "semantics" => node
            .element_children()
            .find(|c| !c.is_any(&["annotation", "annotation-xml"]))
            .map(convert)
            .unwrap_or_default(),
        "annotation" | "annotation-xml" | "none" | "mprescripts" => String::new(),
        "mi" => identifier(node),
        "mn" => node.text_content().trim().to_string(),
        "mo" => operator(node.text_content().trim()),
        "mtext" => {
            let text = node.text_content();
            if text.trim().is_empty() {
                " ".to_string()
            } else {
                format!("\\text{{{text}}}")
            }
        }
        "ms" => format!("\\text{{\"{}\"}}", node.text_content()),
        "mspace" => " ".to_string(),
        "mphantom" => format!("\\phantom{{{}}}", row(node)),
        "msqrt" => format!("\\sqrt{{{}}}", row(node)),
        "mroot" => {
            let a = args(node);
            format!("\\sqrt[{}]{{{}}}", arg(&a, 1), arg(&a, 0))
        }
        "mfrac" => {
            let a = args(node);
            let command = match node.attr("linethickness").map(str::trim) {
                Some("0" | "0px" | "0em") => "binom",
                _ => "frac",
            };
            format!("\\{command}{{{}}}{{{}}}", arg(&a, 0), arg(&a, 1))
        }
        "msup" => {
            let a = args(node);
            format!("{}^{{{}}}", group(&arg(&a, 0)), arg(&a, 1))
        }
        "msub" => {
            let a = args(node);
            format!("{}_{{{}}}", group(&arg(&a, 0)), arg(&a, 1))
        }
        "msubsup" => {
            let a = args(node);
            format!(
                "{}_{{{}}}^{{{}}}",
                group(&arg(&a, 0)),
                arg(&a, 1),
                arg(&a, 2)
            )
        }
        "mover" => over(node),
        "munder" => under(node),
        "munderover" => {
            let a = args(node);
            let base = arg(&a, 0);
            let (below, above) = (arg(&a, 1), arg(&a, 2));
            if LARGE_OPERATORS.contains(&base.as_str()) {
                format!("{base}_{{{below}}}^{{{above}}}")
            } else {
                format!("\\overset{{{above}}}{{\\underset{{{below}}}{{{base}}}}}")
            }
        }
        "mmultiscripts" => multiscripts(node),
        "mfenced" => fenced(node),
        "menclose" => enclose(node),
        "mtable" => table(node),
        _ => row(node),
    }
}

fn identifier(node: NodeRef<'_>) -> String {
    let text = node.text_content();
    let text = text.trim();
    let is_word = text.chars().count() > 1 && text.chars().all(|c| c.is_ascii_alphabetic());

    let latex = if is_word {
        if FUNCTIONS.contains(&text) {
            format!("\\{text}")
        } else {
            format!("\\mathrm{{{text}}}")
        }
    } else {
        map_symbols(text)
    };

    match node.attr("mathvariant") {
        Some("bold") => format!("\\mathbf{{{latex}}}"),
        Some("bold-italic") => format!("\\boldsymbol{{{latex}}}"),
        Some("double-struck") => format!("\\mathbb{{{latex}}}"),
        Some("script") => format!("\\mathcal{{{latex}}}"),
        Some("fraktur") => format!("\\mathfrak{{{latex}}}"),
        Some("normal") if !is_word && text.chars().all(|c| c.is_ascii_alphabetic()) => {
            format!("\\mathrm{{{latex}}}")
        }
        _ => latex,
    }
}

fn operator(text: &str) -> String {
    if text.chars().count() > 1 && text.chars().all(|c| c.is_ascii_alphabetic()) {
        return if FUNCTIONS.contains(&text) {
            format!("\\{text}")
        } else {
            format!("\\operatorname{{{text}}}")
        };
    }
    map_symbols(text)
}

fn over(node: NodeRef<'_>) -> String {
    let a = args(node);
    let base = arg(&a, 0);
    let accent = a.get(1).map(|n| n.text_content()).unwrap_or_default();
    let command = match accent.trim() {
        "^" | "ˆ" | "\u{302}" => Some("hat"),
        "¯" | "‾" | "―" | "_" | "\u{305}" => Some("overline"),
        "→" | "\u{20d7}" => Some("vec"),
        "←" => Some("overleftarrow"),
        "~" | "˜" | "\u{303}" => Some("tilde"),
        "˙" | "." | "\u{307}" => Some("dot"),
        "¨" | "\u{308}" => Some("ddot"),
        "⏞" | "︷" => Some("overbrace"),
        _ => None,
    };
    match command {
        Some(command) => format!("\\{command}{{{base}}}"),
        None if LARGE_OPERATORS.contains(&base.as_str()) => format!("{base}^{{{}}}", arg(&a, 1)),
        None => format!("\\overset{{{}}}{{{base}}}", arg(&a, 1)),
    }
}

fn under(node: NodeRef<'_>) -> String {
    let a = args(node);
    let base = arg(&a, 0);
    let accent = a.get(1).map(|n| n.text_content()).unwrap_or_default();
    match accent.trim() {
        "_" | "\u{332}" | "¯" => format!("\\underline{{{base}}}"),
        "⏟" | "︸" => format!("\\underbrace{{{base}}}"),
        _ if LARGE_OPERATORS.contains(&base.as_str()) => format!("{base}_{{{}}}", arg(&a, 1)),
        _ => format!("\\underset{{{}}}{{{base}}}", arg(&a, 1)),
    }
}

fn scripts(pairs: &[NodeRef<'_>]) -> String {
    let mut out = String::new();
    for pair in pairs.chunks(2) {
        let sub = convert(pair[0]);
        let sup = pair.get(1).map(|n| convert(*n)).unwrap_or_default();
        if !sub.is_empty() {
            out.push_str(&format!("_{{{sub}}}"));
        }
        if !sup.is_empty() {
            out.push_str(&format!("^{{{sup}}}"));
        }
    }
    out
}

fn multiscripts(node: NodeRef<'_>) -> String {
    let a = args(node);
    let Some((base, rest)) = a.split_first() else {
        return String::new();
    };
    let split = rest.iter().position(|n| n.is("mprescripts"));
    let (post, pre) = match split {
        Some(at) => (&rest[..at], &rest[at + 1..]),
        None => (rest, &rest[rest.len()..]),
    };

    let pre = scripts(pre);
    let post = scripts(post);
    let base = group(&convert(*base));
    if pre.is_empty() {
        format!("{base}{post}")
    } else {
        format!("{{}}{pre}{base}{post}")
    }
}

fn delimiter(text: &str) -> String {
    match text {
        "" => ".".to_string(),
        "{" => "\\{".to_string(),
        "}" => "\\}".to_string(),
        other => map_symbols(other),
    }
}

fn fenced(node: NodeRef<'_>) -> String {
    let open = node.attr("open").unwrap_or("(");
    let close = node.attr("close").unwrap_or(")");
    let separators: Vec<char> = node
        .attr("separators")
        .unwrap_or(",")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    let mut inner = String::new();
    for (i, child) in node.element_children().enumerate() {
        if i > 0 {
            if let Some(sep) = separators.get(i - 1).or(separators.last()) {
                inner.push(*sep);
            }
        }
        push_token(&mut inner, &convert(child));
    }
    format!("\\left{}{inner}\\right{}", delimiter(open), delimiter(close))
}

fn enclose(node: NodeRef<'_>) -> String {
    let body = row(node);
    let notation = node.attr("notation").unwrap_or("longdiv");
    let has = |n: &str| notation.split_whitespace().any(|t| t == n);
    if has("box") || has("roundedbox") || has("circle") {
        format!("\\boxed{{{body}}}")
    } else if has("updiagonalstrike") || has("downdiagonalstrike") || has("horizontalstrike") {
        format!("\\cancel{{{body}}}")
    } else if has("radical") {
        format!("\\sqrt{{{body}}}")
    } else if has("top") {
        format!("\\overline{{{body}}}")
    } else if has("bottom") {
        format!("\\underline{{{body}}}")
    } else {
        body
    }
}

fn table(node: NodeRef<'_>) -> String {
    let rows: Vec<String> = node
        .element_children()
        .filter(|r| r.is_any(&["mtr", "mlabeledtr"]))
        .map(|r| {
            let skip = usize::from(r.is("mlabeledtr"));
            r.element_children()
                .skip(skip)
                .map(|cell| row(cell).trim().to_string())
                .collect::<Vec<_>>()
                .join(" & ")
        })
        .collect();
    format!("\\begin{{matrix}} {} \\end{{matrix}}", rows.join(" \\\\ "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_html;

    fn latex(body: &str) -> String {
        let dom = parse_html(&format!("<math>{body}</math>"));
        let math = NodeRef::document(&dom).find_tag("math").unwrap();
        mathml_to_latex(math).unwrap()
    }

    #[test]
    fn test_fraction_and_scripts() {
        assert_eq!(latex("<mfrac><mn>1</mn><mi>x</mi></mfrac>"), "\\frac{1}{x}");
        assert_eq!(latex("<msup><mi>x</mi><mn>2</mn></msup>"), "x^{2}");
        assert_eq!(
            latex("<msubsup><mi>a</mi><mi>i</mi><mn>2</mn></msubsup>"),
            "a_{i}^{2}"
        );
        assert_eq!(
            latex("<msup><mrow><mo>(</mo><mi>x</mi><mo>+</mo><mn>1</mn><mo>)</mo></mrow><mn>2</mn></msup>"),
            "{(x+1)}^{2}"
        );
    }

    #[test]
    fn test_greek_and_radicals() {
        assert_eq!(
            latex("<msqrt><mi>α</mi><mo>+</mo><mi>β</mi></msqrt>"),
            "\\sqrt{\\alpha+\\beta}"
        );
        assert_eq!(latex("<mroot><mi>x</mi><mn>3</mn></mroot>"), "\\sqrt[3]{x}");
    }

    #[test]
    fn test_functions_get_spacing() {
        assert_eq!(latex("<mi>sin</mi><mo>\u{2061}</mo><mi>x</mi>"), "\\sin x");
        assert_eq!(latex("<mi>α</mi><mi>x</mi>"), "\\alpha x");
    }

    #[test]
    fn test_large_operator_limits() {
        assert_eq!(
            latex("<munderover><mo>∑</mo><mrow><mi>i</mi><mo>=</mo><mn>1</mn></mrow><mi>n</mi></munderover><msub><mi>x</mi><mi>i</mi></msub>"),
            "\\sum_{i=1}^{n}x_{i}"
        );
    }

    #[test]
    fn test_accents() {
        assert_eq!(latex("<mover><mi>v</mi><mo>→</mo></mover>"), "\\vec{v}");
        assert_eq!(latex("<mover><mi>x</mi><mo>¯</mo></mover>"), "\\overline{x}");
    }

    #[test]
    fn test_semantics_ignores_annotation() {
        assert_eq!(
            latex(r#"<semantics><mi>y</mi><annotation encoding="application/x-tex">y</annotation></semantics>"#),
            "y"
        );
    }

    #[test]
    fn test_matrix() {
        assert_eq!(
            latex("<mtable><mtr><mtd><mn>1</mn></mtd><mtd><mn>0</mn></mtd></mtr><mtr><mtd><mn>0</mn></mtd><mtd><mn>1</mn></mtd></mtr></mtable>"),
            "\\begin{matrix} 1 & 0 \\\\ 0 & 1 \\end{matrix}"
        );
    }

    #[test]
    fn test_text_and_variants() {
        assert_eq!(latex("<mtext>if</mtext>"), "\\text{if}");
        assert_eq!(latex(r#"<mi mathvariant="double-struck">R</mi>"#), "\\mathbb{R}");
    }

    #[test]
    fn test_non_element_rejected() {
        let dom = parse_html("<p>text</p>");
        let text = NodeRef::document(&dom).find_tag("p").unwrap().children().next().unwrap();
        assert!(matches!(mathml_to_latex(text), Err(RuleError::MathMl(_))));
    }

    #[test]
    fn test_deep_nesting_fails_the_document() {
        let body = format!("{}<mi>y</mi>{}", "<mrow>".repeat(5000), "</mrow>".repeat(5000));
        let dom = parse_html(&format!("<math>{body}</math>"));
        let math = NodeRef::document(&dom).find_tag("math").unwrap();
        assert!(matches!(
            mathml_to_latex(math),
            Err(RuleError::Document(Error::DepthExceeded { limit: MAX_DEPTH }))
        ));

        let shallow = format!("{}<mi>y</mi>{}", "<mrow>".repeat(40), "</mrow>".repeat(40));
        assert_eq!(latex(&shallow), "y");
    }
}
