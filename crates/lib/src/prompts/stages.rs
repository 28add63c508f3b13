//! # Stage Templates
//!
//! The instruction text, base rules and expected-output descriptions for every
//! pipeline stage. Client profiles add their own rule lines on top of these.
//!
//! Placeholders bound by the pipeline factory: `{tema}`, `{palavra_chave}`,
//! `{display_name}`, `{niche}`, `{tone}`, `{review_tone}`, `{min_words}`,
//! `{competitor_digest}`, `{internal_links}`, `{external_links}`,
//! `{signature_html}`, `{rules}`, `{meta_max_chars}`, `{mandated_heading_a}`,
//! `{mandated_heading_b}`.

// --- Role conditioning ---

pub const ROLE_SYSTEM_PROMPT: &str = r#"Você é {role}. {backstory}
Seu objetivo pessoal é: {goal}
Responda sempre em português do Brasil e entregue apenas o resultado solicitado, sem comentários adicionais."#;

/// Heading that introduces prior stage outputs in a user prompt.
pub const PRIOR_CONTEXT_HEADER: &str = "# Contexto das etapas anteriores";
/// Label for the expected output of a stage in a user prompt.
pub const EXPECTED_OUTPUT_LABEL: &str = "Resultado esperado:";

// --- 1. Introduction ---

pub const INTRODUCTION_INSTRUCTION: &str = r#"Escreva a INTRODUÇÃO (2–3 <p>) para '{tema}' usando a palavra‑chave '{palavra_chave}' apenas 1 vez.
{tone}
Regras:
{rules}
Links internos disponíveis:
{internal_links}
Concorrência (inspiração – NÃO copiar):
{competitor_digest}"#;

pub const INTRODUCTION_RULES: &[&str] = &[
    "PT-BR; parágrafos curtos (2–4 linhas).",
    "Sem clichês e sem promessas vazias.",
    "PROIBIDO: <h1> e qualquer imagem (<img>, <figure>, <picture>, <svg>, background-image).",
    "Não usar headings na introdução; só <p>.",
    "Se houver âncora compatível, inclua no máximo 1 link interno natural, apenas no 2º parágrafo (anchor descritiva).",
];

pub const INTRODUCTION_EXPECTED_OUTPUT: &str =
    "2–3 <p> curtos, sem headings e sem imagens, com a palavra-chave exatamente 1 vez.";

// --- 2. Outline ---

pub const OUTLINE_INSTRUCTION: &str = r#"Crie a ESTRUTURA (apenas headings) para '{tema}':
{rules}
Baseie a cobertura na intenção de busca e em lacunas/oportunidades dos concorrentes:
{competitor_digest}"#;

pub const OUTLINE_RULES: &[&str] = &[
    "5–7 <h2> numerados com prefixo '1. ', '2. ', '3. ' ... (numeração sequencial).",
    "Até 2 <h3> por <h2> quando fizer sentido (sem numeração).",
    "Pelo menos UM heading (<h2> ou <h3>) deve conter a palavra-chave '{palavra_chave}' de forma natural.",
    "Incluir um H2 equivalente a \"{mandated_heading_a}\" e outro a \"{mandated_heading_b}\".",
    "Nunca usar <h1>. Não incluir conteúdo; só <h2>/<h3>.",
];

pub const OUTLINE_EXPECTED_OUTPUT: &str =
    "Lista de <h2> numerados (5–7) e até 2 <h3> por <h2>, sem <h1> e sem conteúdo.";

// --- 3. Body ---

pub const BODY_INSTRUCTION: &str = r#"Desenvolva o CORPO a partir dos H2/H3 definidos, mantendo a numeração dos H2:
{rules}
Links internos disponíveis:
{internal_links}
Concorrência (inspiração – NÃO copiar):
{competitor_digest}"#;

pub const BODY_RULES: &[&str] = &[
    "Mínimo de {min_words} palavras no post completo (será validado no unificador).",
    "<p> curtos (2–4 linhas); usar <ul><li> quando listar.",
    "Variar semântica de '{palavra_chave}' sem stuffing.",
    "Sem autopromoção e sem CTA.",
    "PROIBIDO inserir imagens.",
    "Não inventar novos headings; usar apenas os fornecidos.",
    "Quando fizer sentido, inclua links internos naturais no corpo (anchors descritivas).",
];

pub const BODY_EXPECTED_OUTPUT: &str =
    "Conteúdo completo sob cada H2/H3, com <p> e <ul><li>, sem imagens e sem novos headings.";

// --- 4. Conclusion ---

pub const CONCLUSION_INSTRUCTION: &str = r#"Escreva a CONCLUSÃO para '{tema}':
{rules}"#;

pub const CONCLUSION_RULES: &[&str] = &[
    "1–2 <p> resumindo aprendizados e próximos passos práticos.",
    "Zero CTA (o CTA fica na assinatura).",
    "Inclua 1 link interno natural se ainda não houver link na conclusão.",
    "Não inserir imagens.",
];

pub const CONCLUSION_EXPECTED_OUTPUT: &str = "1–2 <p> de fechamento, sem CTA e sem imagens.";

// --- 5. Merge ---

pub const MERGE_INSTRUCTION: &str = r#"Una introdução, corpo e conclusão em um único HTML (conteúdo do body, sem <body>).
Regras:
{rules}
Saída: somente o conteúdo do body."#;

pub const MERGE_RULES: &[&str] = &[
    "Garantir coerência, zero repetição de headings e manter a NUMERAÇÃO dos <h2> (1., 2., 3., ...).",
    "Mínimo {min_words} palavras no total.",
    "Usar apenas: <h2>, <h3>, <p>, <ul>, <li>, <a>, <strong>, <em>.",
    "PROIBIDO: <h1>, <html>, <head>, <title>, meta, estilos inline, QUALQUER tag de imagem.",
];

pub const MERGE_EXPECTED_OUTPUT: &str =
    "HTML único (conteúdo do body) com os <h2> numerados preservados e apenas as tags permitidas.";

// --- 6. Link insertion ---

pub const LINK_INSERTION_INSTRUCTION: &str = r#"Insira LINKAGEM no HTML unificado (intro/corpo/conclusão) seguindo as regras.

Links internos disponíveis (use pelo menos 3, distribuídos):
{internal_links}

Links externos candidatos (use >=1, se listado; com target="_blank" rel="noopener noreferrer"):
{external_links}

Regras:
{rules}
Saída: HTML com linkagem aplicada."#;

pub const LINK_INSERTION_RULES: &[&str] = &[
    "Distribuição sugerida: 1 link interno na introdução, 1–2 no corpo e 1 na conclusão.",
    "Âncoras naturais e descritivas; nunca usar \"clique aqui\" ou \"saiba mais\" como âncora.",
    "Links externos sempre com target=\"_blank\" rel=\"noopener noreferrer\".",
    "Não linkar em headings; apenas em <p> e <li>.",
    "Não quebrar HTML semântico; sem inline style.",
    "Não adicionar imagens.",
];

/// Appended to the link rules for clients whose catalog is caller-curated.
pub const LINK_UNIQUE_PAIR_RULE: &str = "Não repetir a mesma URL com a mesma âncora mais de 1x.";

/// Appended to the link rules for clients without an internal catalog.
pub const LINK_NO_CATALOG_RULE: &str =
    "Sem catálogo interno: não invente URLs internas; aplique apenas a linkagem externa.";

pub const LINK_INSERTION_EXPECTED_OUTPUT: &str =
    "HTML final com linkagem interna (>=3, quando houver catálogo) e externa aplicada, sem links em headings.";

// --- 7. Signature ---

pub const SIGNATURE_STATIC_INSTRUCTION: &str = r#"Anexar ao FINAL do HTML a assinatura institucional (sem alterar o conteúdo anterior):

{signature_html}"#;

pub const SIGNATURE_TEMPLATED_INSTRUCTION: &str = r#"Crie e ANEXE ao FINAL do HTML a assinatura personalizada de {display_name}, adaptada ao TEMA '{tema}' (sem alterar o conteúdo anterior):

{signature_html}

Regras:
{rules}"#;

pub const SIGNATURE_TEMPLATED_RULES: &[&str] = &[
    "Substitua os colchetes [ ] com frases curtas e naturais baseadas no TEMA.",
    "Não repita a palavra-chave em excesso; seja natural e acolhedor.",
    "Mantenha os links e o endereço exatamente como estão.",
    "Não inserir imagens nem estilos inline.",
];

pub const SIGNATURE_EXPECTED_OUTPUT: &str =
    "HTML completo com a assinatura anexada ao final, sem alterar o conteúdo anterior.";

// --- 8. Review ---

pub const REVIEW_INSTRUCTION: &str = r#"Revise o HTML final quanto a:
{rules}
Saída: lista de melhorias acionáveis em bullets JSON-like:
- {"campo":"trecho/resumo","problema":"...","acao":"..."}"#;

pub const REVIEW_RULES: &[&str] = &[
    "Ortografia/gramática PT-BR; clareza; {review_tone}.",
    "Estilo: H2 numerados, parágrafos curtos, listas quando úteis.",
    "Coerência e distribuição de links; âncoras descritivas; ausência de overstuffing de '{palavra_chave}'.",
    "Respeito às proibições de imagens e de <h1>.",
];

pub const REVIEW_EXPECTED_OUTPUT: &str =
    "Lista de melhorias acionáveis no formato {\"campo\",\"problema\",\"acao\"}.";

// --- 9. Correction ---

pub const CORRECTION_INSTRUCTION: &str = r#"Aplique TODAS as melhorias propostas na revisão ao HTML com assinatura, preservando:
{rules}
Saída: HTML final (somente conteúdo do body)."#;

pub const CORRECTION_RULES: &[&str] = &[
    "Estrutura semântica (<h2> numerados/<h3>/<p>/<ul><li>/<a>).",
    "Linkagem já aplicada (ajuste âncora só se necessário).",
    "Ausência de imagens e de <h1>.",
    "Assinatura final sem alterações.",
];

pub const CORRECTION_EXPECTED_OUTPUT: &str = "HTML final revisado (somente conteúdo do body).";

// --- 10. SEO refinement ---

pub const SEO_REFINEMENT_INSTRUCTION: &str = r#"Otimize o HTML final para SEO em {niche}, sem alterar a estrutura, a linkagem nem a assinatura.
Regras:
{rules}"#;

pub const SEO_REFINEMENT_RULES: &[&str] = &[
    "Gerar uma meta description com até {meta_max_chars} caracteres contendo a palavra-chave '{palavra_chave}'.",
    "Sugerir um título (até 60 caracteres) com a palavra-chave no início, quando natural.",
    "Não reescrever parágrafos além de ajustes pontuais de palavra-chave.",
];

pub const SEO_REFINEMENT_EXPECTED_OUTPUT: &str = "HTML otimizado + título + meta description.";

// --- 11. Packaging ---

pub const PACKAGING_INSTRUCTION: &str = r#"Gere o JSON final com os campos: titulo, meta_description, html_body. Formate para API.
Regras:
{rules}"#;

pub const PACKAGING_RULES: &[&str] = &[
    "Responda APENAS com um objeto JSON válido, sem texto antes ou depois.",
    "titulo: o título sugerido na etapa de SEO.",
    "meta_description: até {meta_max_chars} caracteres.",
    "html_body: o HTML final otimizado (somente conteúdo do body), como string JSON escapada.",
];

pub const PACKAGING_EXPECTED_OUTPUT: &str =
    r#"{"titulo": "...", "meta_description": "...", "html_body": "..."}"#;
