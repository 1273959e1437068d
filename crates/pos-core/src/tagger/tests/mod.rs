mod retagger;
