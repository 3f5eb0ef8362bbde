pub const TRANSACTIONS_FILE_MARKER: &str = "_Движение_денежных_средств_";
pub const DEALS_FILE_MARKER: &str = "_Сделки_";

pub const INSTRUMENTS_MARKER: &str = "Акция";
pub const FOREX_MARKER: &str = "Объём в валюте лота (в ед. валюты)";

pub const PAYMENT_AMOUNT_COLUMN: &str = "Сумма платежа";
pub const INSTRUMENTS_HEADER_ROW: usize = 2;
pub const TICKER_CELL: usize = 1;

pub const ISIN_MARKER: &str = "ISIN:";
pub const LOT_CURRENCY_MARKER: &str = "Валюта лота:";
pub const LOT_CURRENCY_FIELD: &str = "Валюта лота";
pub const PAIRED_CURRENCY_FIELD: &str = "Сопряж. валюта";
pub const SUBTOTAL_MARKER: &str = "Итого по";

pub const TOTALS_MARKER: &str = "Итого";
pub const ACCOUNT_CURRENCY_CELL: usize = 1;

pub const DATE_COLUMN: &str = "Дата";
pub const OPERATION_COLUMN: &str = "Операция";
pub const CREDIT_COLUMN: &str = "Сумма зачисления";
pub const DEBIT_COLUMN: &str = "Сумма списания";
pub const CURRENCY_COLUMN: &str = "Валюта";

pub const TICKER_FIELD: &str = "Ticker";
pub const ISIN_FIELD: &str = "ISIN";
pub const FROM_FIELD: &str = "From";
pub const TO_FIELD: &str = "To";
