mod instruction_encoder_tests;
mod opcode_selection_tests;
