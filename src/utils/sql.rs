use sea_orm::ColumnTrait;
use sea_orm::sea_query::{Expr, LikeExpr};

/// 转义 LIKE 模式中的通配符
pub fn escape_like_pattern(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// 列内容包含给定文本，`%` 与 `_` 按字面匹配
pub fn contains_literal<C: ColumnTrait>(column: C, text: &str) -> Expr {
    let pattern = format!("%{}%", escape_like_pattern(text));
    column.like(LikeExpr::new(pattern).escape('\\'))
}
