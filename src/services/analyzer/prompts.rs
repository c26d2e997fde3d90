//! Prompt de avaliação enviado ao serviço externo

pub const SYSTEM_MESSAGE: &str = "Você é um assistente especializado em validar documentos de LRCO \
(Livro de Registro de Classe Online) para o Estágio Probatório de professores no Paraná. \
Responda sempre com um único objeto JSON, sem texto adicional.";

/// Monta a mensagem do usuário com as regras e o texto (já truncado)
pub fn build_assessment_prompt(text: &str) -> String {
    format!(
        r#"Analise o texto abaixo e verifique os seguintes critérios:

1. **Registro de Avaliação**: Deve conter:
   - Resolução 3.037/2024 - GS/SEED
   - Resolução 7.342/2024 - GS/SEED
   - Menção à progressão de ano (1º→2º ou 2º→3º)

2. **Objetivos de Conteúdo**:
   - Registros de encontros/aulas devem conter objetivos de aprendizagem

3. **Frequências**:
   - Conte o número TOTAL de DATAS/REGISTROS únicos no documento
   - Cada data representa um encontro/registro
   - O total de registros deve ser número PAR entre 42 e 50
   - NÃO conte menções à palavra "frequência", conte DATAS (formato DD/MM/AAAA ou similar)

Retorne APENAS um objeto JSON válido com o seguinte formato:
{{
  "registroAvaliacao": {{
    "passed": true ou false,
    "details": "explicação detalhada do resultado",
    "foundResolutions": ["lista de resoluções encontradas"]
  }},
  "objetivosConteudo": {{
    "passed": true ou false,
    "details": "explicação detalhada do resultado"
  }},
  "frequencias": {{
    "passed": true ou false,
    "details": "explicação detalhada do resultado",
    "total": número total de frequências encontradas
  }}
}}

TEXTO DO PDF:
{}"#,
        text
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_text_and_keys() {
        let prompt = build_assessment_prompt("conteúdo do lrco");
        assert!(prompt.ends_with("conteúdo do lrco"));
        for key in ["registroAvaliacao", "objetivosConteudo", "frequencias", "foundResolutions"] {
            assert!(prompt.contains(key), "{}", key);
        }
        assert!(prompt.contains("\"total\""));
    }
}
