//! Résumé document generator.
//!
//! Maps a [`ResumeData`] onto a complete LaTeX source document. Pure and
//! deterministic: no I/O, no clock, no shared state. Identical input
//! always yields byte-identical output.
//!
//! Document order: preamble → centered header → Experience → Education →
//! Technical Skills. Sections without renderable entries are omitted.

use crate::latex::escape::escape_latex;
use crate::latex::GenerationError;
use crate::models::resume::{Education, Experience, Fonts, Layout, PersonalInfo, ResumeData};

/// Leading added to a section heading's point size.
pub const SECTION_LEADING_PT: u32 = 2;
/// Leading added to the name's point size.
pub const NAME_LEADING_PT: u32 = 4;

/// Separator placed between contact fields in the header.
const CONTACT_SEPARATOR: &str = r" $|$ ";

/// Line break between skill lines. `\\` looks past whitespace for a `*` or
/// `[` argument; the empty group ends that scan so the next line's text is
/// never read as one.
const SKILL_LINE_BREAK: &str = r" \\{}";

/// Helper macros shared by every generated document.
const MACROS: &str = r"\newcommand{\resumeHeading}[4]{
\begin{tabular*}{\textwidth}[t]{l@{\extracolsep{\fill}}r}
    \textbf{#1} & #2 \\
    \textit{\small #3} & \textit{\small #4} \\
\end{tabular*}
}
\newcommand{\resumeSubheading}[4]{\resumeHeading{#1}{#2}{#3}{#4}\vspace{-7pt}}
\newcommand{\resumeGpa}[1]{
\vspace{-5pt}
\begin{tabular*}{\textwidth}[t]{l}
    \small GPA: #1 \\
\end{tabular*}
}

\newcommand{\resumeItemListStart}{\begin{itemize}[leftmargin=0.15in, label=$\bullet$]}
\newcommand{\resumeItemListEnd}{\end{itemize}\vspace{-5pt}}
\newcommand{\resumeItem}[1]{\item\small{#1 \vspace{-2pt}}}
";

// ────────────────────────────────────────────────────────────────────────────
// Entry point
// ────────────────────────────────────────────────────────────────────────────

/// Generates the LaTeX source for `data`.
///
/// Fails only when `personal.name` is blank; every other gap is handled by
/// omission or by the layout defaults resolved at deserialization.
pub fn generate(data: &ResumeData) -> Result<String, GenerationError> {
    let sections = &data.sections;
    let name = sections.personal.name.trim();
    if name.is_empty() {
        return Err(GenerationError::MissingName);
    }

    let mut doc = String::with_capacity(4096);
    write_preamble(&mut doc, &data.layout);

    doc.push_str("\\begin{document}\n\n");
    write_header(&mut doc, &sections.personal, &data.layout.fonts);
    write_experience(&mut doc, &sections.experience);
    write_education(&mut doc, &sections.education);
    write_skills(&mut doc, &sections.skills);
    doc.push_str("\\end{document}\n");

    Ok(doc)
}

// ────────────────────────────────────────────────────────────────────────────
// Preamble
// ────────────────────────────────────────────────────────────────────────────

fn write_preamble(doc: &mut String, layout: &Layout) {
    let m = &layout.margins;
    let fonts = &layout.fonts;
    let spacing = &layout.spacing;

    doc.push_str(&format!(
        "\\documentclass[letterpaper,{}pt]{{article}}\n",
        fonts.content_size
    ));
    doc.push_str(&format!(
        "\\usepackage[top={}mm,bottom={}mm,left={}mm,right={}mm]{{geometry}}\n",
        m.top, m.bottom, m.left, m.right
    ));
    doc.push_str(
        "\\usepackage{enumitem}\n\
         \\usepackage{titlesec}\n\
         \\usepackage{fontspec}\n\
         \\usepackage{xcolor}\n\n\
         \\pagestyle{empty}\n\
         \\setmainfont{Times New Roman}\n\n",
    );

    doc.push_str(&format!(
        "\\titleformat{{\\section}}{{\\fontsize{{{}pt}}{{{}pt}}\\selectfont\\bfseries\\uppercase}}{{}}{{0pt}}{{}}[\\titlerule]\n",
        fonts.section_size,
        fonts.section_size + SECTION_LEADING_PT
    ));
    doc.push_str(&format!(
        "\\titlespacing*{{\\section}}{{0pt}}{{{}pt}}{{{}pt}}\n\n",
        spacing.section_spacing, spacing.item_spacing
    ));

    doc.push_str(MACROS);
    doc.push('\n');
}

// ────────────────────────────────────────────────────────────────────────────
// Header
// ────────────────────────────────────────────────────────────────────────────

fn write_header(doc: &mut String, personal: &PersonalInfo, fonts: &Fonts) {
    let name_line = format!(
        "    {{\\fontsize{{{}pt}}{{{}pt}}\\selectfont\\textbf{{{}}}}}",
        fonts.name_size,
        fonts.name_size + NAME_LEADING_PT,
        escape_latex(personal.name.trim())
    );

    doc.push_str("\\begin{center}\n");
    match contact_line(personal) {
        Some(contacts) => {
            doc.push_str(&name_line);
            doc.push_str(" \\\\\n    \\vspace{2pt}\n");
            doc.push_str(&format!("    {{\\small {contacts}}}\n"));
        }
        None => {
            doc.push_str(&name_line);
            doc.push('\n');
        }
    }
    doc.push_str("\\end{center}\n\n");
}

/// Joins the present contact fields in fixed order: phone, email,
/// location, website. Returns `None` when all of them are blank.
fn contact_line(personal: &PersonalInfo) -> Option<String> {
    let parts: Vec<String> = [
        &personal.phone,
        &personal.email,
        &personal.location,
        &personal.website,
    ]
    .into_iter()
    .map(|field| field.trim())
    .filter(|field| !field.is_empty())
    .map(escape_latex)
    .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(CONTACT_SEPARATOR))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

fn write_experience(doc: &mut String, experience: &[Experience]) {
    if experience.is_empty() {
        return;
    }

    doc.push_str("\\section{Experience}\n");
    for exp in experience {
        doc.push_str(&format!(
            "\\resumeSubheading\n    {{{}}}{{{}}}\n    {{{}}}{{{}}}\n",
            escape_latex(exp.title.trim()),
            date_range(&exp.start_date, &exp.end_date),
            escape_latex(exp.company.trim()),
            escape_latex(exp.location.trim()),
        ));

        let bullets = non_blank(&exp.bullets);
        if !bullets.is_empty() {
            doc.push_str("    \\resumeItemListStart\n");
            for bullet in bullets {
                doc.push_str(&format!("        \\resumeItem{{{}}}\n", escape_latex(bullet)));
            }
            doc.push_str("    \\resumeItemListEnd\n");
        }
        doc.push('\n');
    }
}

fn write_education(doc: &mut String, education: &[Education]) {
    if education.is_empty() {
        return;
    }

    doc.push_str("\\section{Education}\n");
    for edu in education {
        doc.push_str(&format!(
            "\\resumeHeading\n    {{{}}}{{{}}}\n    {{{}}}{{{}}}\n",
            escape_latex(edu.degree.trim()),
            escape_latex(edu.graduation_date.trim()),
            escape_latex(edu.school.trim()),
            escape_latex(edu.location.trim()),
        ));
        if let Some(gpa) = edu.gpa() {
            doc.push_str(&format!("\\resumeGpa{{{}}}\n", escape_latex(gpa)));
        }
        doc.push_str("\\vspace{-7pt}\n\n");
    }
}

fn write_skills(doc: &mut String, skills: &[String]) {
    let lines = non_blank(skills);
    if lines.is_empty() {
        return;
    }

    doc.push_str("\\section{Technical Skills}\n");
    doc.push_str("\\begin{itemize}[leftmargin=0.15in, label={}]\n");
    doc.push_str("    \\small{\\item{\n");

    let last = lines.len() - 1;
    for (i, line) in lines.iter().enumerate() {
        doc.push_str("        ");
        doc.push_str(&skill_line(line));
        if i < last {
            doc.push_str(SKILL_LINE_BREAK);
        }
        doc.push('\n');
    }

    doc.push_str("    }}\n");
    doc.push_str("\\end{itemize}\n\n");
}

/// Renders `Category: items` with a bold category; lines without a colon
/// are plain text. Both halves are escaped.
fn skill_line(line: &str) -> String {
    match line.split_once(':') {
        Some((category, items)) => {
            let items = items.trim();
            let category = format!("\\textbf{{{}:}}", escape_latex(category.trim()));
            if items.is_empty() {
                category
            } else {
                format!("{category} {}", escape_latex(items))
            }
        }
        None => escape_latex(line),
    }
}

/// `start -- end` when both are present, otherwise whichever one is.
fn date_range(start: &str, end: &str) -> String {
    match (start.trim(), end.trim()) {
        ("", "") => String::new(),
        (start, "") => escape_latex(start),
        ("", end) => escape_latex(end),
        (start, end) => format!("{} -- {}", escape_latex(start), escape_latex(end)),
    }
}

fn non_blank(lines: &[String]) -> Vec<&str> {
    lines
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
