use serde::Serialize;

use crate::models::ComparisonResult;

/// 前 5 家供应商的单价列 (F/G/H, I/J/K, ...)，之后按 3 列一块继续向右扩展
const BASE_COLUMNS: [&str; 5] = ["F", "I", "L", "O", "R"];
const BLOCK_WIDTH: usize = 3;
const MAX_SHEET_NAME: usize = 31;

/// 某供应商在 sheet 中占用的列
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VendorColumns {
    pub vendor_name: String,
    pub label: String,
    pub unit_price_column: String,
    pub total_column: String,
    pub total_base_column: String,
    pub is_overall_best: bool,
}

/// 单个 sheet 的布局计划 (供模板注入/程序生成两种渲染器使用)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetPlan {
    pub index: usize,
    pub name: String,
    pub vendors: Vec<VendorColumns>,
}

/// 每个供应商分组一个 sheet
pub fn plan_sheets(result: &ComparisonResult) -> Vec<SheetPlan> {
    let group_size = result.policy.max_vendors_per_group.max(1);

    result
        .vendor_groups()
        .into_iter()
        .enumerate()
        .map(|(index, group)| {
            let name = match group.as_slice() {
                [] => "Comparison".to_string(),
                [only] => sheet_name(&only.name),
                _ => {
                    let start = index * group_size + 1;
                    format!("Vendors {}-{}", start, start + group.len() - 1)
                }
            };

            let vendors = group
                .iter()
                .enumerate()
                .map(|(slot, vendor)| {
                    let [unit_price_column, total_column, total_base_column] = vendor_block(slot);
                    VendorColumns {
                        vendor_name: vendor.name.clone(),
                        label: vendor.display_label(),
                        unit_price_column,
                        total_column,
                        total_base_column,
                        is_overall_best: result.is_overall_best(&vendor.name),
                    }
                })
                .collect();

            SheetPlan { index, name, vendors }
        })
        .collect()
}

/// Excel sheet 名: 替换 [ ] : * ? / \ 并截断到 31 个字符
fn sheet_name(vendor_name: &str) -> String {
    vendor_name
        .chars()
        .map(|c| match c {
            '[' | ']' | ':' | '*' | '?' | '/' | '\\' => '-',
            other => other,
        })
        .take(MAX_SHEET_NAME)
        .collect()
}

/// 第 slot 家供应商的 [单价, 合计, 本位币合计] 列
pub fn vendor_block(slot: usize) -> [String; 3] {
    let start = match BASE_COLUMNS.get(slot) {
        Some(letter) => column_index(letter).unwrap_or(0),
        None => {
            let last = column_index(BASE_COLUMNS[BASE_COLUMNS.len() - 1]).unwrap_or(0);
            last + (slot - BASE_COLUMNS.len() + 1) * BLOCK_WIDTH
        }
    };
    [
        column_letter(start),
        column_letter(start + 1),
        column_letter(start + 2),
    ]
}

/// 1 -> A, 26 -> Z, 27 -> AA
pub fn column_letter(index: usize) -> String {
    let mut n = index;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// A -> 1, AA -> 27；非字母返回 None
pub fn column_index(letters: &str) -> Option<usize> {
    if letters.is_empty() {
        return None;
    }
    letters.chars().try_fold(0usize, |acc, c| {
        let c = c.to_ascii_uppercase();
        c.is_ascii_uppercase()
            .then(|| acc * 26 + (c as usize - 'A' as usize + 1))
    })
}
