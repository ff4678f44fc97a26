pub mod attribute_value;
pub mod change_event;
pub mod table_schema;
pub mod write_intent;
