use crate::domain::commands::data_reset::ResetResult;
use shared::ResetResponse;

pub struct DataResetMapper;

impl DataResetMapper {
    pub fn to_response(result: ResetResult) -> ResetResponse {
        ResetResponse {
            expenses_deleted: result.expenses_deleted,
            income_deleted: result.income_deleted,
            start_date: result.range.map(|r| r.start),
            end_date: result.range.map(|r| r.end),
            success_message: result.success_message,
        }
    }
}
