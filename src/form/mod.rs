// ==========================================
// 孵化场生产管理系统 - 表单层
// ==========================================
// 职责: 类型化字段输入、通用记录编辑器
// ==========================================

pub mod editor;
pub mod field;
pub mod records;

pub use editor::{EditorError, EditorState, RecordEditor, Submission};
pub use field::{coerce_decimal, coerce_int, parse_field, FieldKind, FieldValue, FormRecord};
