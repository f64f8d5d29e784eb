//! Placeholder tokens for the estimate introduction letter. The editor inserts
//! them verbatim; they are only filled in when the letter is rendered.

use crate::models::Estimate;

/// A placeholder the introduction editor can insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub label: &'static str,
    pub placeholder: &'static str,
}

pub const TOKENS: [Token; 5] = [
    Token {
        label: "Customer Name",
        placeholder: "{{CUSTOMER_NAME}}",
    },
    Token {
        label: "Project Address",
        placeholder: "{{PROJECT_ADDRESS}}",
    },
    Token {
        label: "Quote Date",
        placeholder: "{{QUOTE_DATE}}",
    },
    Token {
        label: "Quote Number",
        placeholder: "{{QUOTE_NUMBER}}",
    },
    Token {
        label: "Total Amount",
        placeholder: "{{TOTAL_AMOUNT}}",
    },
];

fn token_value(placeholder: &str, estimate: &Estimate) -> Option<String> {
    let value = match placeholder {
        "{{CUSTOMER_NAME}}" => estimate.customer_name.clone(),
        "{{PROJECT_ADDRESS}}" => estimate.project_address.clone(),
        "{{QUOTE_DATE}}" => estimate.quote_date.clone(),
        "{{QUOTE_NUMBER}}" => estimate.quote_number.clone(),
        "{{TOTAL_AMOUNT}}" => estimate.formatted_total(),
        _ => return None,
    };
    Some(value)
}

/// Fill every known token in `template` from `estimate`. Unknown `{{...}}`
/// sequences are kept as written, and substituted values are never scanned
/// again.
pub fn render_introduction(template: &str, estimate: &Estimate) -> String {
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        rendered.push_str(&rest[..start]);
        let candidate = &rest[start..];
        let Some(end) = candidate.find("}}") else {
            rest = candidate;
            break;
        };
        let placeholder = &candidate[..end + 2];
        match token_value(placeholder, estimate) {
            Some(value) => rendered.push_str(&value),
            None => rendered.push_str(placeholder),
        }
        rest = &candidate[end + 2..];
    }

    rendered.push_str(rest);
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EstimateStatus;

    fn estimate() -> Estimate {
        Estimate {
            id: 1,
            company_id: 1,
            quote_number: "Q-0001".to_string(),
            customer_name: "John Smith".to_string(),
            project_address: "123 Main St".to_string(),
            quote_date: "2024-03-15".to_string(),
            total_cents: 1_250_000,
            status: EstimateStatus::Provided,
            introduction: String::new(),
            created_date: String::new(),
            modified_date: String::new(),
        }
    }

    #[test]
    fn every_token_is_filled() {
        let template = TOKENS
            .iter()
            .map(|token| token.placeholder)
            .collect::<Vec<_>>()
            .join("|");

        let rendered = render_introduction(&template, &estimate());

        assert_eq!(
            rendered,
            "John Smith|123 Main St|2024-03-15|Q-0001|$12,500.00"
        );
    }

    #[test]
    fn unknown_and_unterminated_tokens_are_left_alone() {
        let rendered = render_introduction(
            "Hi {{CUSTOMER_NAME}}, see {{SIGNATURE}} and {{QUOTE_NUMBER",
            &estimate(),
        );

        assert_eq!(rendered, "Hi John Smith, see {{SIGNATURE}} and {{QUOTE_NUMBER");
    }

    #[test]
    fn substituted_values_are_not_expanded_again() {
        let mut estimate = estimate();
        estimate.customer_name = "{{TOTAL_AMOUNT}}".to_string();

        let rendered = render_introduction("Dear {{CUSTOMER_NAME}}", &estimate);

        assert_eq!(rendered, "Dear {{TOTAL_AMOUNT}}");
    }
}
