//! Fixed instructions sent to the completion service.
//!
//! Template instructions override the split and extract defaults when they
//! are non-empty.

use serde_json::json;

use crate::domain::models::Template;

/// Marker the classifier must emit for a report.
pub const REPORT_MARKER: &str = "REPORT";

/// Marker the classifier emits for ordinary conversation.
pub const TALK_MARKER: &str = "TALK";

pub const CLASSIFIER_INSTRUCTION: &str = "Ты - очень точная модель классификации агрономических \
отчётов. Тебе дадут сообщение из чата, и нужно определить, является ли оно агрономическим \
отчётом. Агрономический отчёт - сообщение в свободной форме с информацией об операциях на полях. \
Если сообщение является отчётом, напиши 'REPORT', если нет - напиши 'TALK'.\n\
Примеры отчётов:\n\
1)\nСевер\nОтд7 пах с св 41/501\nОтд20 20/281 по пу 61/793\nДиск под Оз п 20/281\n\n\
2)\nПривет, по отделу 7 прошлись пахотой сах свеклы 41/501.\n\n\
Если сообщение хоть как-то похоже на агрономический отчёт, пиши 'REPORT'.";

pub const DEFAULT_SPLIT_INSTRUCTION: &str = "Пользователь даст тебе отчёт из чата, и нужно \
разделить его по операциям. Исходный формат свободный и может содержать сокращения. Возможные \
операции: междурядная культивация, боронование, внесение удобрений, выравнивание зяби, \
гербицидная обработка, дискование, инсектицидная обработка, культивация, пахота, подкормка, \
предпосевная культивация, прикатывание посевов, сев, сплошная культивация, уборка, фунгицидная \
обработка, чизелевание. Для каждой операции перепиши в точности все относящиеся к ней данные. \
Если информация относится ко всем операциям (дата, подразделение), добавь её к каждому \
разделённому сообщению. Выведи результат как json объект с полем separated_reports - массивом \
строк. Не выводи ничего, кроме корректного json.";

pub const DEFAULT_EXTRACT_INSTRUCTION: &str = "Ты - очень точная модель. Тебе дадут сообщение из \
агрономического чата, и нужно выделить из него информацию в строгом формате csv с разделителем \
';'. Первая строка - заголовок с названиями столбцов.";

pub const REPAIR_INSTRUCTION: &str = "Твоя задача исправить таблицу, получив ответы на \
дополнительные вопросы. Когда пользователь ответит на все вопросы, выведи итоговую исправленную \
таблицу в формате ```csv\n<таблица здесь>```. Убедись, что во всех строках заполнены \
обязательные поля. Если пользователь не ответил на вопросы, переспроси.";

pub const CONVERSATION_INSTRUCTION: &str = "Ты - добрый и позитивный агент в системе обработки \
агрономических сообщений. Общайся с пользователем и подскажи, что отчёт можно просто отправить \
в этот чат текстом, изображением или голосовым сообщением. Обработкой отчёта займётся другой \
агент автоматически.";

pub fn classify_user_turn(text: &str) -> String {
    format!("Вот сообщение, которое тебе необходимо классифицировать: {text}")
}

pub fn split_user_turn(text: &str) -> String {
    format!("Вот сообщение, которое тебе необходимо разделить: {text}")
}

pub fn extract_user_turn(fragment: &str) -> String {
    format!("Вот сообщение, которое тебе необходимо обработать: {fragment}")
}

/// Split instruction for `template`, falling back to the default.
pub fn split_instruction(template: &Template) -> &str {
    non_empty(&template.split_instruction).unwrap_or(DEFAULT_SPLIT_INSTRUCTION)
}

/// Extract instruction for `template` followed by its output contract.
pub fn extract_instruction(template: &Template) -> String {
    let base = non_empty(&template.extract_instruction).unwrap_or(DEFAULT_EXTRACT_INSTRUCTION);
    format!(
        "{base}\n\n{definition}\
         Используй ровно эти столбцы в этом порядке и не пропускай их; некоторые значения могут \
         быть пустыми. Помести итоговую таблицу в блок ```csv\n<таблица>```. Если в сообщении нет \
         данных для обязательных полей, задай вопрос отправителю в блоке ```question\n<вопрос>```.",
        definition = template.table_definition(),
    )
}

/// JSON schema constraining the splitter's answer.
pub fn split_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "separated_reports": {
                "type": "array",
                "items": { "type": "string" }
            }
        },
        "required": ["separated_reports"]
    })
}

fn non_empty(s: &str) -> Option<&str> {
    Some(s).filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_overrides_split_instruction() {
        let template = Template::new(vec![], vec![]).with_instructions("custom split", "");
        assert_eq!(split_instruction(&template), "custom split");

        let template = Template::new(vec![], vec![]).with_instructions("  ", "");
        assert_eq!(split_instruction(&template), DEFAULT_SPLIT_INSTRUCTION);
    }

    #[test]
    fn test_extract_instruction_carries_contract() {
        let template = Template::new(vec!["Операция".into()], vec!["Операция".into()])
            .with_instructions("", "custom extract");
        let instruction = extract_instruction(&template);

        assert!(instruction.starts_with("custom extract"));
        assert!(instruction.contains("Столбец: Операция"));
        assert!(instruction.contains("```csv"));
        assert!(instruction.contains("```question"));
    }

    #[test]
    fn test_split_schema_requires_reports() {
        let schema = split_schema();
        assert_eq!(schema["required"][0], "separated_reports");
    }
}
