//! Built-in label tables.

use super::LabelKey::{self, *};

pub(super) const EN: &[(LabelKey, &str)] = &[
    (Title, "Credit Card Statement"),
    (CardholderInfo, "Cardholder Information"),
    (Name, "Name"),
    (CardNumber, "Card Number"),
    (BillingAddress, "Billing Address"),
    (Email, "Email"),
    (Phone, "Phone"),
    (StatementSummary, "Statement Summary"),
    (Amount, "Amount"),
    (PreviousBalance, "Previous Balance"),
    (PaymentsReceived, "Payments Received"),
    (PurchasesCharges, "Purchases & Charges"),
    (FinanceCharges, "Finance Charges"),
    (NewBalance, "New Balance"),
    (CreditLimit, "Credit Limit"),
    (AvailableCredit, "Available Credit"),
    (Transactions, "Transactions"),
    (Date, "Date"),
    (Description, "Description"),
    (Page, "Page"),
    (Of, "of"),
    (
        StatementFooter,
        "Thank you for banking with us. Please contact customer service for any queries.",
    ),
    (StatementDate, "Statement Date"),
    (InvalidLanguage, "Invalid language code"),
    (MissingFields, "Missing required fields"),
    (InvalidEmail, "Invalid email address"),
    (InvalidCard, "Invalid card number"),
    (InvalidPhone, "Invalid phone number"),
];

pub(super) const TA: &[(LabelKey, &str)] = &[
    (Title, "கிரெடிட் கார்டு அறிக்கை"),
    (CardholderInfo, "அட்டைதாரர் தகவல்"),
    (Name, "பெயர்"),
    (CardNumber, "அட்டை எண்"),
    (BillingAddress, "பில்லிங் முகவரி"),
    (Email, "மின்னஞ்சல்"),
    (Phone, "தொலைபேசி"),
    (StatementSummary, "அறிக்கை சுருக்கம்"),
    (Amount, "தொகை"),
    (PreviousBalance, "முந்தைய இருப்பு"),
    (PaymentsReceived, "பெறப்பட்ட கொடுப்பனவுகள்"),
    (PurchasesCharges, "கொள்முதல் மற்றும் கட்டணங்கள்"),
    (FinanceCharges, "நிதிக் கட்டணங்கள்"),
    (NewBalance, "புதிய இருப்பு"),
    (CreditLimit, "கடன் வரம்பு"),
    (AvailableCredit, "கிடைக்கும் கடன்"),
    (Transactions, "பரிவர்த்தனைகள்"),
    (Date, "தேதி"),
    (Description, "விளக்கம்"),
    (Page, "பக்கம்"),
    (Of, "இல்"),
    (
        StatementFooter,
        "எங்களுடன் வங்கிச் சேவை பெற்றதற்கு நன்றி. ஏதேனும் கேள்விகளுக்கு வாடிக்கையாளர் சேவையைத் தொடர்பு கொள்ளவும்.",
    ),
    (StatementDate, "அறிக்கை தேதி"),
    (InvalidLanguage, "தவறான மொழிக் குறியீடு"),
    (MissingFields, "தேவையான புலங்கள் இல்லை"),
    (InvalidEmail, "தவறான மின்னஞ்சல் முகவரி"),
    (InvalidCard, "தவறான அட்டை எண்"),
    (InvalidPhone, "தவறான தொலைபேசி எண்"),
];

pub(super) const HI: &[(LabelKey, &str)] = &[
    (Title, "क्रेडिट कार्ड विवरण"),
    (CardholderInfo, "कार्डधारक की जानकारी"),
    (Name, "नाम"),
    (CardNumber, "कार्ड संख्या"),
    (BillingAddress, "बिलिंग पता"),
    (Email, "ईमेल"),
    (Phone, "फ़ोन"),
    (StatementSummary, "विवरण सारांश"),
    (Amount, "राशि"),
    (PreviousBalance, "पिछला शेष"),
    (PaymentsReceived, "प्राप्त भुगतान"),
    (PurchasesCharges, "खरीदारी और शुल्क"),
    (FinanceCharges, "वित्त शुल्क"),
    (NewBalance, "नया शेष"),
    (CreditLimit, "क्रेडिट सीमा"),
    (AvailableCredit, "उपलब्ध क्रेडिट"),
    (Transactions, "लेन-देन"),
    (Date, "तारीख"),
    (Description, "विवरण"),
    (Page, "पृष्ठ"),
    (Of, "का"),
    (
        StatementFooter,
        "हमारे साथ बैंकिंग करने के लिए धन्यवाद। किसी भी प्रश्न के लिए ग्राहक सेवा से संपर्क करें।",
    ),
    (StatementDate, "विवरण तिथि"),
    (InvalidLanguage, "अमान्य भाषा कोड"),
    (MissingFields, "आवश्यक फ़ील्ड अनुपलब्ध हैं"),
    (InvalidEmail, "अमान्य ईमेल पता"),
    (InvalidCard, "अमान्य कार्ड संख्या"),
    (InvalidPhone, "अमान्य फ़ोन नंबर"),
];
