use crate::models::{Sequence, Taxonomy};

pub const EMPTY_MESSAGE: &str = "<p>Aucun quiz trouvé. Vérifiez les dossiers.</p>";

// One card per sequence; the grid CSS turns each card into a column.
pub fn render_sequence_grid(sequences: &[Sequence]) -> String {
    let mut html = String::from("<div class=\"sequences-grid\">");

    for sequence in sequences {
        let mut quiz_list = String::from("<ul class=\"quizzes-list\">");
        for quiz in &sequence.quizzes {
            quiz_list.push_str(&format!(
                r#"
                <li class="quiz-item">
                    <a href="{}" class="quiz-link" target="_blank">
                        <span class="quiz-logo" aria-hidden="true">🧠</span>
                        Quiz N°{}
                    </a>
                </li>
            "#,
                quiz.href, quiz.index
            ));
        }
        quiz_list.push_str("</ul>");

        html.push_str(&format!(
            r#"
            <div class="sequence-card">
                <h4>{}</h4>
                {}
            </div>
        "#,
            sequence.title, quiz_list
        ));
    }

    html.push_str("</div>");
    html
}

// Empty string when nothing is left to show, so callers can substitute the fallback message.
pub fn render_accordion(taxonomy: &Taxonomy) -> String {
    let mut html = String::new();

    for grade in &taxonomy.grades {
        if grade.sequences.is_empty() {
            continue;
        }
        html.push_str(&format!(
            r#"
            <div class="accordion-item">
                <div class="accordion-header" id="accordion-{}">
                    Niveau {}
                </div>
                <div class="accordion-content">
                    {}
                </div>
            </div>
        "#,
            grade.name,
            grade.name.to_uppercase(),
            render_sequence_grid(&grade.sequences)
        ));
    }

    html
}

pub fn render_page(taxonomy: &Taxonomy) -> String {
    let accordion = render_accordion(taxonomy);
    let content = if accordion.is_empty() { EMPTY_MESSAGE } else { accordion.as_str() };

    format!(
        r#"
<!DOCTYPE html>
<html lang="fr">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Plateforme de Quiz Scolaires</title>
    <link href="https://fonts.googleapis.com/css2?family=Poppins:wght@300;400;600;700&display=swap" rel="stylesheet">
    <link rel="stylesheet" href="/styles.css">
</head>
<body>

<header>
    <div class="container">
        <h1>Plateforme de Quiz Scolaires 🚀</h1>
        <p>Liens générés à partir des dossiers de quiz : toujours à jour !</p>
    </div>
</header>

<main class="container">
    <div id="quiz-container">
        {content}
    </div>
</main>

<script>
    function activateAccordion() {{
        const headers = document.querySelectorAll('.accordion-header');

        headers.forEach((header, index) => {{
            header.addEventListener('click', () => {{
                const content = header.nextElementSibling;
                const isActive = header.classList.contains('active');

                document.querySelectorAll('.accordion-header').forEach(h => {{
                    h.classList.remove('active');
                    h.nextElementSibling.style.display = 'none';
                }});

                if (!isActive) {{
                    header.classList.add('active');
                    content.style.display = 'block';
                }}
            }});
            if (index === 0) {{
                header.click();
            }}
        }});
    }}

    document.addEventListener('DOMContentLoaded', activateAccordion);
</script>

</body>
</html>
"#
    )
}
