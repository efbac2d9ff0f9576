//! Instruction template for the narrative analysis request.

const ANALYST_TEMPLATE: &str = "\
You are a financial data analyst AI. Analyze the following dataset provided in CSV format.
Your analysis should include:

1. A concise summary of the dataset (number of rows, columns, and types of data).
2. Key statistics for numeric columns (min, max, mean, totals).
3. Detection of trends, anomalies, or outliers.
4. Insights on categorical columns, including top categories or most frequent values.
5. Suggestions for interesting visualizations or patterns to explore.

Provide your response in a clear, structured, and reader-friendly format.

Dataset:
";

/// Embed a CSV rendering of the cleaned table into the analyst instructions.
pub fn build_prompt(csv: &str) -> String {
    let mut prompt = String::with_capacity(ANALYST_TEMPLATE.len() + csv.len() + 1);
    prompt.push_str(ANALYST_TEMPLATE);
    prompt.push_str(csv);
    if !csv.ends_with('\n') {
        prompt.push('\n');
    }
    prompt
}
